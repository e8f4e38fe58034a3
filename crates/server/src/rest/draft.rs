use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared_types::{
    normalize_pagination, AppError, DraftResponse, DraftStatus, DraftSummary, ListDraftsResponse,
    PaginationMeta, ResolvedAttachment, SaveDraftRequest, SubmitDraftResponse,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::ValidateRequest;
use crate::identity::OwnerTag;
use crate::repo::draft::{self, DraftRow, DraftSummaryRow};
use crate::repo::file;
use crate::{fees, ids};

/// Fields a draft must carry before it can be submitted (or saved
/// non-partially). Keys double as field_errors keys.
const CORE_FIELDS: &[&str] = &[
    "court_level",
    "filing_type",
    "petitioner_name",
    "respondent_name",
    "case_subject",
    "advocate_name",
    "enrollment_number",
];

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn missing_core_fields(req: &SaveDraftRequest) -> HashMap<String, String> {
    let mut missing = HashMap::new();
    let mut check = |name: &str, absent: bool| {
        if absent {
            missing.insert(name.to_string(), "This field is required".to_string());
        }
    };
    check(CORE_FIELDS[0], req.court_level.is_none());
    check(CORE_FIELDS[1], req.filing_type.is_none());
    check(CORE_FIELDS[2], is_blank(&req.petitioner_name));
    check(CORE_FIELDS[3], is_blank(&req.respondent_name));
    check(CORE_FIELDS[4], is_blank(&req.case_subject));
    check(CORE_FIELDS[5], is_blank(&req.advocate_name));
    check(CORE_FIELDS[6], is_blank(&req.enrollment_number));
    missing
}

/// A partial (autosave) request must carry at least one piece of
/// content, otherwise there is nothing to persist.
fn has_any_content(req: &SaveDraftRequest) -> bool {
    req.court_level.is_some()
        || req.filing_type.is_some()
        || !is_blank(&req.petitioner_name)
        || !is_blank(&req.respondent_name)
        || !is_blank(&req.case_subject)
        || !is_blank(&req.advocate_name)
        || !is_blank(&req.enrollment_number)
        || !is_blank(&req.email)
        || !is_blank(&req.phone)
        || !is_blank(&req.notes)
        || req.uploaded_files.as_ref().is_some_and(|f| !f.is_empty())
}

/// Join a draft row against the file store so each attachment carries
/// the live status of the file it points at.
async fn to_response(pool: &Pool<Postgres>, row: DraftRow) -> Result<DraftResponse, AppError> {
    let attachment_ids: Vec<Uuid> = row.attachments.0.iter().map(|a| a.file_id).collect();
    let statuses = file::statuses_for(pool, &attachment_ids).await?;
    let uploaded_files = row
        .attachments
        .0
        .into_iter()
        .map(|a| ResolvedAttachment {
            file_status: statuses.get(&a.file_id).cloned(),
            attachment: a,
        })
        .collect();

    Ok(DraftResponse {
        draft_id: row.draft_id,
        user_id: row.user_id,
        court_level: row.court_level,
        filing_type: row.filing_type,
        petitioner_name: row.petitioner_name,
        respondent_name: row.respondent_name,
        case_subject: row.case_subject,
        advocate_name: row.advocate_name,
        enrollment_number: row.enrollment_number,
        email: row.email,
        phone: row.phone,
        uploaded_files,
        estimated_fee: row.estimated_fee,
        service_charge: row.service_charge,
        total_amount: row.total_amount,
        status: row.status,
        filing_reference: row.filing_reference,
        notes: row.notes,
        last_modified: row.last_modified,
        created_at: row.created_at,
    })
}

fn to_summary(row: DraftSummaryRow) -> DraftSummary {
    DraftSummary {
        draft_id: row.draft_id,
        court_level: row.court_level,
        filing_type: row.filing_type,
        petitioner_name: row.petitioner_name,
        case_subject: row.case_subject,
        status: row.status,
        total_amount: row.total_amount,
        uploaded_files: row.uploaded_files,
        last_modified: row.last_modified,
        days_since_modified: row.days_since_modified,
        created_at: row.created_at,
    }
}

/// Create or update a draft. The request carries the whole form; fees
/// are recomputed server-side on every save.
#[utoipa::path(
    post,
    path = "/api/efiling/drafts",
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "Draft saved", body = DraftResponse),
        (status = 404, description = "Draft not found", body = AppError),
        (status = 409, description = "Draft already submitted", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "drafts"
)]
pub async fn save_draft(
    State(pool): State<Pool<Postgres>>,
    owner: OwnerTag,
    Json(req): Json<SaveDraftRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    req.validate_request()?;

    if req.partial {
        if !has_any_content(&req) {
            return Err(AppError::bad_request("Nothing to save"));
        }
    } else {
        let missing = missing_core_fields(&req);
        if !missing.is_empty() {
            return Err(AppError::validation("Required fields are missing", missing));
        }
    }

    let fees = fees::calculate(req.court_level, req.filing_type);

    let row = match &req.draft_id {
        Some(draft_id) => {
            match draft::update(&pool, draft_id, owner.as_deref(), &req, fees).await? {
                Some(row) => row,
                None => {
                    // Distinguish a missing draft from one past editing.
                    match draft::get(&pool, draft_id, owner.as_deref()).await? {
                        Some(_) => {
                            return Err(AppError::conflict("Draft has already been submitted"))
                        }
                        None => return Err(AppError::not_found("Draft not found")),
                    }
                }
            }
        }
        None => {
            let draft_id = ids::draft_id();
            draft::insert(&pool, &draft_id, owner.as_deref(), &req, fees).await?
        }
    };

    tracing::info!(draft_id = %row.draft_id, partial = req.partial, "draft saved");
    Ok(Json(to_response(&pool, row).await?))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListDraftsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// List the caller's drafts, newest first.
#[utoipa::path(
    get,
    path = "/api/efiling/drafts",
    params(ListDraftsQuery),
    responses(
        (status = 200, description = "Draft list", body = ListDraftsResponse),
        (status = 400, description = "Unknown status filter", body = AppError)
    ),
    tag = "drafts"
)]
pub async fn list_drafts(
    State(pool): State<Pool<Postgres>>,
    owner: OwnerTag,
    Query(query): Query<ListDraftsQuery>,
) -> Result<Json<ListDraftsResponse>, AppError> {
    let status = match &query.status {
        Some(s) => Some(
            DraftStatus::parse(s)
                .ok_or_else(|| AppError::bad_request(format!("Unknown status '{s}'")))?,
        ),
        None => None,
    };

    let (page, limit) = normalize_pagination(query.page, query.limit);
    let (rows, total) = draft::list(
        &pool,
        owner.as_deref(),
        status.map(|s| s.as_str()),
        page,
        limit,
    )
    .await?;

    let count = rows.len() as i64;
    Ok(Json(ListDraftsResponse {
        drafts: rows.into_iter().map(to_summary).collect(),
        pagination: PaginationMeta::new(page, limit, count, total),
    }))
}

/// Fetch one draft with its attachments resolved.
#[utoipa::path(
    get,
    path = "/api/efiling/drafts/{draft_id}",
    params(("draft_id" = String, Path, description = "Draft identifier")),
    responses(
        (status = 200, description = "Draft", body = DraftResponse),
        (status = 404, description = "Draft not found", body = AppError)
    ),
    tag = "drafts"
)]
pub async fn get_draft(
    State(pool): State<Pool<Postgres>>,
    owner: OwnerTag,
    Path(draft_id): Path<String>,
) -> Result<Json<DraftResponse>, AppError> {
    let row = draft::get(&pool, &draft_id, owner.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Draft not found"))?;
    Ok(Json(to_response(&pool, row).await?))
}

/// Delete a draft that has not been submitted yet.
#[utoipa::path(
    delete,
    path = "/api/efiling/drafts/{draft_id}",
    params(("draft_id" = String, Path, description = "Draft identifier")),
    responses(
        (status = 200, description = "Draft deleted"),
        (status = 404, description = "Draft not found", body = AppError),
        (status = 409, description = "Draft already submitted", body = AppError)
    ),
    tag = "drafts"
)]
pub async fn delete_draft(
    State(pool): State<Pool<Postgres>>,
    owner: OwnerTag,
    Path(draft_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if draft::delete_if_editable(&pool, &draft_id, owner.as_deref()).await? {
        return Ok(Json(serde_json::json!({ "deleted": true })));
    }
    match draft::get(&pool, &draft_id, owner.as_deref()).await? {
        Some(_) => Err(AppError::conflict(
            "Submitted drafts cannot be deleted",
        )),
        None => Err(AppError::not_found("Draft not found")),
    }
}

/// Submit a complete draft for processing, issuing its filing
/// reference and freezing its fee amounts.
#[utoipa::path(
    post,
    path = "/api/efiling/drafts/{draft_id}/submit",
    params(("draft_id" = String, Path, description = "Draft identifier")),
    responses(
        (status = 200, description = "Draft submitted", body = SubmitDraftResponse),
        (status = 404, description = "Draft not found", body = AppError),
        (status = 409, description = "Draft already submitted", body = AppError),
        (status = 422, description = "Draft incomplete", body = AppError)
    ),
    tag = "drafts"
)]
pub async fn submit_draft(
    State(pool): State<Pool<Postgres>>,
    owner: OwnerTag,
    Path(draft_id): Path<String>,
) -> Result<Json<SubmitDraftResponse>, AppError> {
    let row = draft::get(&pool, &draft_id, owner.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Draft not found"))?;

    if row.status != DraftStatus::Draft.as_str() {
        return Err(AppError::conflict("Draft has already been submitted"));
    }

    let stored = SaveDraftRequest {
        court_level: row.court_level.as_deref().and_then(shared_types::CourtLevel::parse),
        filing_type: row.filing_type.as_deref().and_then(shared_types::FilingType::parse),
        petitioner_name: row.petitioner_name.clone(),
        respondent_name: row.respondent_name.clone(),
        case_subject: row.case_subject.clone(),
        advocate_name: row.advocate_name.clone(),
        enrollment_number: row.enrollment_number.clone(),
        ..Default::default()
    };
    let missing = missing_core_fields(&stored);
    if !missing.is_empty() {
        return Err(AppError::validation("Draft is not complete", missing));
    }

    let fees = fees::calculate(stored.court_level, stored.filing_type);
    let filing_reference = ids::filing_reference();

    let updated = draft::mark_submitted(&pool, &draft_id, owner.as_deref(), &filing_reference, fees)
        .await?
        // A concurrent submit won the race between our read and write.
        .ok_or_else(|| AppError::conflict("Draft has already been submitted"))?;

    tracing::info!(
        draft_id = %updated.draft_id,
        filing_reference = %filing_reference,
        total_amount = updated.total_amount,
        "draft submitted"
    );

    Ok(Json(SubmitDraftResponse {
        filing_reference,
        draft_id: updated.draft_id,
        status: updated.status,
        total_amount: updated.total_amount,
    }))
}
