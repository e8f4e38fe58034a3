use chrono::{DateTime, Utc};
use shared_types::{AppError, DraftAttachment, SaveDraftRequest};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;
use crate::fees::FeeBreakdown;

/// A single row from the `drafts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DraftRow {
    pub draft_id: String,
    pub user_id: Option<String>,
    pub court_level: Option<String>,
    pub filing_type: Option<String>,
    pub petitioner_name: Option<String>,
    pub respondent_name: Option<String>,
    pub case_subject: Option<String>,
    pub advocate_name: Option<String>,
    pub enrollment_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub attachments: Json<Vec<DraftAttachment>>,
    pub estimated_fee: i64,
    pub service_charge: i64,
    pub total_amount: i64,
    pub status: String,
    pub filing_reference: Option<String>,
    pub filing_number: Option<String>,
    pub payment_id: Option<String>,
    pub notes: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Summary row for the draft list. Attachment payloads stay out of the
/// list; only the count travels.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DraftSummaryRow {
    pub draft_id: String,
    pub court_level: Option<String>,
    pub filing_type: Option<String>,
    pub petitioner_name: Option<String>,
    pub case_subject: Option<String>,
    pub status: String,
    pub total_amount: i64,
    pub uploaded_files: i64,
    pub last_modified: DateTime<Utc>,
    pub days_since_modified: i64,
    pub created_at: DateTime<Utc>,
}

const DRAFT_COLUMNS: &str = "draft_id, user_id, court_level, filing_type, petitioner_name, \
    respondent_name, case_subject, advocate_name, enrollment_number, email, phone, \
    attachments, estimated_fee, service_charge, total_amount, status, filing_reference, \
    filing_number, payment_id, notes, last_modified, created_at";

/// Insert a fresh draft. All field content comes from the validated
/// request; fee amounts come from the server-side schedule.
pub async fn insert(
    pool: &Pool<Postgres>,
    draft_id: &str,
    owner: Option<&str>,
    req: &SaveDraftRequest,
    fees: FeeBreakdown,
) -> Result<DraftRow, AppError> {
    let attachments = Json(req.uploaded_files.clone().unwrap_or_default());
    let sql = format!(
        "INSERT INTO drafts \
            (draft_id, user_id, court_level, filing_type, petitioner_name, respondent_name, \
             case_subject, advocate_name, enrollment_number, email, phone, attachments, \
             estimated_fee, service_charge, total_amount, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         RETURNING {DRAFT_COLUMNS}"
    );
    sqlx::query_as::<_, DraftRow>(&sql)
        .bind(draft_id)
        .bind(owner)
        .bind(req.court_level.map(|c| c.as_str()))
        .bind(req.filing_type.map(|f| f.as_str()))
        .bind(&req.petitioner_name)
        .bind(&req.respondent_name)
        .bind(&req.case_subject)
        .bind(&req.advocate_name)
        .bind(&req.enrollment_number)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(attachments)
        .bind(fees.estimated_fee)
        .bind(fees.service_charge)
        .bind(fees.total_amount)
        .bind(&req.notes)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Replace the editable fields of an existing draft. Fields absent from
/// the request are cleared, not kept — a save carries the whole form.
/// Only drafts still in `draft` status can be edited; returns None when
/// no editable row matched.
pub async fn update(
    pool: &Pool<Postgres>,
    draft_id: &str,
    owner: Option<&str>,
    req: &SaveDraftRequest,
    fees: FeeBreakdown,
) -> Result<Option<DraftRow>, AppError> {
    let attachments = Json(req.uploaded_files.clone().unwrap_or_default());
    let sql = format!(
        "UPDATE drafts SET \
            court_level = $3, filing_type = $4, petitioner_name = $5, respondent_name = $6, \
            case_subject = $7, advocate_name = $8, enrollment_number = $9, email = $10, \
            phone = $11, attachments = $12, estimated_fee = $13, service_charge = $14, \
            total_amount = $15, notes = $16, last_modified = NOW() \
         WHERE draft_id = $1 AND user_id IS NOT DISTINCT FROM $2 AND status = 'draft' \
         RETURNING {DRAFT_COLUMNS}"
    );
    sqlx::query_as::<_, DraftRow>(&sql)
        .bind(draft_id)
        .bind(owner)
        .bind(req.court_level.map(|c| c.as_str()))
        .bind(req.filing_type.map(|f| f.as_str()))
        .bind(&req.petitioner_name)
        .bind(&req.respondent_name)
        .bind(&req.case_subject)
        .bind(&req.advocate_name)
        .bind(&req.enrollment_number)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(attachments)
        .bind(fees.estimated_fee)
        .bind(fees.service_charge)
        .bind(fees.total_amount)
        .bind(&req.notes)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Fetch one draft scoped to its owner.
pub async fn get(
    pool: &Pool<Postgres>,
    draft_id: &str,
    owner: Option<&str>,
) -> Result<Option<DraftRow>, AppError> {
    let sql = format!(
        "SELECT {DRAFT_COLUMNS} FROM drafts \
         WHERE draft_id = $1 AND user_id IS NOT DISTINCT FROM $2"
    );
    sqlx::query_as::<_, DraftRow>(&sql)
        .bind(draft_id)
        .bind(owner)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// List an owner's drafts, newest first, optionally filtered by status.
/// Returns the page plus the total match count for pagination.
pub async fn list(
    pool: &Pool<Postgres>,
    owner: Option<&str>,
    status: Option<&str>,
    page: i64,
    limit: i64,
) -> Result<(Vec<DraftSummaryRow>, i64), AppError> {
    let offset = (page - 1) * limit;

    let rows = sqlx::query_as::<_, DraftSummaryRow>(
        "SELECT draft_id, court_level, filing_type, petitioner_name, case_subject, status, \
                total_amount, \
                jsonb_array_length(attachments)::bigint AS uploaded_files, \
                last_modified, \
                FLOOR(EXTRACT(EPOCH FROM (NOW() - last_modified)) / 86400)::bigint \
                    AS days_since_modified, \
                created_at \
         FROM drafts \
         WHERE user_id IS NOT DISTINCT FROM $1 AND ($2::text IS NULL OR status = $2) \
         ORDER BY last_modified DESC \
         LIMIT $3 OFFSET $4",
    )
    .bind(owner)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM drafts \
         WHERE user_id IS NOT DISTINCT FROM $1 AND ($2::text IS NULL OR status = $2)",
    )
    .bind(owner)
    .bind(status)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok((rows, total))
}

/// Delete a draft that is still editable. Returns true if a row went
/// away; the caller distinguishes missing from already-submitted.
pub async fn delete_if_editable(
    pool: &Pool<Postgres>,
    draft_id: &str,
    owner: Option<&str>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "DELETE FROM drafts \
         WHERE draft_id = $1 AND user_id IS NOT DISTINCT FROM $2 AND status = 'draft'",
    )
    .bind(draft_id)
    .bind(owner)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}

/// Move a draft to `submitted`, stamping its filing reference and final
/// amounts. The `status = 'draft'` guard makes double submission lose
/// the race cleanly; None means no eligible row matched.
pub async fn mark_submitted(
    pool: &Pool<Postgres>,
    draft_id: &str,
    owner: Option<&str>,
    filing_reference: &str,
    fees: FeeBreakdown,
) -> Result<Option<DraftRow>, AppError> {
    let sql = format!(
        "UPDATE drafts SET \
            status = 'submitted', filing_reference = $3, estimated_fee = $4, \
            service_charge = $5, total_amount = $6, last_modified = NOW() \
         WHERE draft_id = $1 AND user_id IS NOT DISTINCT FROM $2 AND status = 'draft' \
         RETURNING {DRAFT_COLUMNS}"
    );
    sqlx::query_as::<_, DraftRow>(&sql)
        .bind(draft_id)
        .bind(owner)
        .bind(filing_reference)
        .bind(fees.estimated_fee)
        .bind(fees.service_charge)
        .bind(fees.total_amount)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Whether any draft's attachment list references the given file.
/// Uses JSONB containment so the GIN index on `attachments` applies.
pub async fn references_file(pool: &Pool<Postgres>, file_id: Uuid) -> Result<bool, AppError> {
    let needle = serde_json::json!([{ "file_id": file_id }]);
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM drafts WHERE attachments @> $1)",
    )
    .bind(needle)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
