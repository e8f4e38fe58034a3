use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use sha2::{Digest, Sha256};
use shared_types::{
    file_extension, is_allowed_mime_type, is_valid_category, readable_size, AppError,
    CategoryBreakdown, CourtLevel, FileAnalyticsResponse, FileDetailsResponse, FileKind,
    FilingType, RecentUpload, StatusBreakdown, TypeBreakdown, UploadError, UploadResponse,
    UploadSummary, UploadedFileInfo, MAX_BATCH_FILES, MAX_DESCRIPTION_LEN, MAX_FILE_SIZE,
};
use uuid::Uuid;

use crate::db::AppState;
use crate::identity::OwnerTag;
use crate::ids;
use crate::repo::{draft, file};

struct IncomingFile {
    original_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Filing context declared alongside the binaries. All fields are
/// optional text parts of the multipart form.
#[derive(Default)]
struct UploadMetadata {
    category: Option<String>,
    filing_type: Option<String>,
    court_level: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
}

/// Pull the `files` parts and declared metadata out of the multipart
/// body. Unknown parts are ignored.
async fn collect_parts(
    mut multipart: Multipart,
) -> Result<(Vec<IncomingFile>, UploadMetadata), AppError> {
    let mut incoming = Vec::new();
    let mut meta = UploadMetadata::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "unnamed".to_string());
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read upload: {e}")))?
                    .to_vec();
                incoming.push(IncomingFile {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            "category" | "filing_type" | "court_level" | "description" | "tags" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read field: {e}")))?;
                let value = value.trim().to_string();
                if value.is_empty() {
                    continue;
                }
                match name.as_str() {
                    "category" => meta.category = Some(value),
                    "filing_type" => meta.filing_type = Some(value),
                    "court_level" => meta.court_level = Some(value),
                    "description" => meta.description = Some(value),
                    "tags" => {
                        meta.tags = value
                            .split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string)
                            .collect()
                    }
                    _ => unreachable!(),
                }
            }
            _ => {}
        }
    }
    Ok((incoming, meta))
}

/// Declared filing context is mandatory and comes from fixed
/// vocabularies; a free-text description is capped.
fn check_metadata(meta: &UploadMetadata) -> Result<(), AppError> {
    if !meta
        .filing_type
        .as_deref()
        .is_some_and(|v| FilingType::parse(v).is_some())
    {
        return Err(AppError::bad_request("Valid filing type is required"));
    }
    if !meta
        .court_level
        .as_deref()
        .is_some_and(|v| CourtLevel::parse(v).is_some())
    {
        return Err(AppError::bad_request("Valid court level is required"));
    }
    if !meta.category.as_deref().is_some_and(is_valid_category) {
        return Err(AppError::bad_request("Valid file category is required"));
    }
    if meta
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
    {
        return Err(AppError::bad_request(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Reject the whole batch when it breaks a hard constraint, before
/// anything is stored. Only processing failures degrade to per-file
/// errors.
fn check_batch(files: &[IncomingFile]) -> Result<(), AppError> {
    if files.is_empty() {
        return Err(AppError::bad_request("No files uploaded"));
    }
    if files.len() > MAX_BATCH_FILES {
        return Err(AppError::payload_too_large(format!(
            "Too many files: maximum is {MAX_BATCH_FILES} per upload"
        )));
    }
    for f in files {
        if f.bytes.len() as i64 > MAX_FILE_SIZE {
            return Err(AppError::payload_too_large(format!(
                "'{}' exceeds the {} limit",
                f.original_name,
                readable_size(MAX_FILE_SIZE)
            )));
        }
        if !is_allowed_mime_type(&f.content_type) {
            return Err(AppError::unsupported_media_type(format!(
                "'{}' has unsupported type '{}'",
                f.original_name, f.content_type
            )));
        }
    }
    Ok(())
}

/// Store a batch of filing documents.
#[utoipa::path(
    post,
    path = "/api/files",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload results", body = UploadResponse),
        (status = 400, description = "Empty upload or invalid declared metadata", body = AppError),
        (status = 413, description = "File or batch too large", body = AppError),
        (status = 415, description = "Unsupported file type", body = AppError)
    ),
    tag = "files"
)]
pub async fn upload_files(
    State(state): State<AppState>,
    owner: OwnerTag,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (incoming, meta) = collect_parts(multipart).await?;
    check_metadata(&meta)?;
    check_batch(&incoming)?;

    let total = incoming.len();
    let mut stored = Vec::new();
    let mut errors = Vec::new();

    for f in incoming {
        let checksum = hex::encode(Sha256::digest(&f.bytes));
        let ext = file_extension(&f.original_name);
        let filename = ids::storage_name(&ext);
        let kind = FileKind::classify(&f.content_type);
        let size = f.bytes.len() as i64;

        // Blob first, then metadata: a failed metadata write must not
        // leave an orphaned blob behind.
        if let Err(e) = state.store.put(&filename, &f.content_type, f.bytes).await {
            tracing::error!(original_name = %f.original_name, error = %e, "blob write failed");
            errors.push(UploadError {
                original_name: f.original_name,
                message: "Failed to store file".to_string(),
            });
            continue;
        }

        let row = match file::insert(
            &state.pool,
            file::NewFile {
                filename: &filename,
                original_name: &f.original_name,
                storage_key: &filename,
                size,
                mimetype: &f.content_type,
                file_type: kind.as_str(),
                category: meta.category.as_deref(),
                filing_type: meta.filing_type.as_deref(),
                court_level: meta.court_level.as_deref(),
                description: meta.description.as_deref(),
                tags: &meta.tags,
                checksum: &checksum,
                uploaded_by: owner.as_deref(),
            },
        )
        .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(original_name = %f.original_name, error = %e, "metadata write failed, removing blob");
                if let Err(e) = state.store.delete(&filename).await {
                    tracing::error!(storage_key = %filename, error = %e, "orphaned blob cleanup failed");
                }
                errors.push(UploadError {
                    original_name: f.original_name,
                    message: "Failed to record file".to_string(),
                });
                continue;
            }
        };

        tracing::info!(file_id = %row.id, size, "file stored");
        stored.push(UploadedFileInfo {
            id: row.id,
            filename: row.filename,
            original_name: row.original_name,
            size: row.size,
            readable_size: readable_size(row.size),
            file_type: row.file_type,
            status: row.status,
            upload_date: row.upload_date,
        });
    }

    let summary = UploadSummary {
        total,
        succeeded: stored.len(),
        failed: errors.len(),
    };
    Ok(Json(UploadResponse {
        files: stored,
        errors,
        summary,
    }))
}

/// Aggregate statistics over stored files.
#[utoipa::path(
    get,
    path = "/api/files/analytics/summary",
    responses(
        (status = 200, description = "File analytics", body = FileAnalyticsResponse)
    ),
    tag = "files"
)]
pub async fn file_analytics(
    State(state): State<AppState>,
) -> Result<Json<FileAnalyticsResponse>, AppError> {
    let stats = file::analytics(&state.pool).await?;
    let now = Utc::now();
    Ok(Json(FileAnalyticsResponse {
        total_files: stats.totals.total_files,
        total_size: stats.totals.total_size,
        readable_total_size: readable_size(stats.totals.total_size),
        average_size: stats.totals.average_size,
        total_downloads: stats.totals.total_downloads,
        types: stats
            .types
            .into_iter()
            .map(|t| TypeBreakdown {
                file_type: t.file_type,
                count: t.count,
                total_size: t.total_size,
            })
            .collect(),
        statuses: stats
            .statuses
            .into_iter()
            .map(|s| StatusBreakdown {
                status: s.status,
                count: s.count,
            })
            .collect(),
        categories: stats
            .categories
            .into_iter()
            .map(|c| CategoryBreakdown {
                category: c.category,
                count: c.count,
            })
            .collect(),
        recent_uploads: stats
            .recent
            .into_iter()
            .map(|r| RecentUpload {
                id: r.id,
                original_name: r.original_name,
                file_type: r.file_type,
                size: r.size,
                status: r.status,
                days_since_upload: (now - r.upload_date).num_days().max(0),
                upload_date: r.upload_date,
            })
            .collect(),
    }))
}

fn to_details(row: file::FileRow) -> FileDetailsResponse {
    let days_since_upload = (Utc::now() - row.upload_date).num_days().max(0);
    FileDetailsResponse {
        id: row.id,
        extension: file_extension(&row.original_name),
        filename: row.filename,
        original_name: row.original_name,
        size: row.size,
        readable_size: readable_size(row.size),
        mimetype: row.mimetype,
        file_type: row.file_type,
        category: row.category,
        filing_type: row.filing_type,
        court_level: row.court_level,
        description: row.description,
        tags: row.tags,
        status: row.status,
        download_count: row.download_count,
        last_accessed: row.last_accessed,
        upload_date: row.upload_date,
        days_since_upload,
    }
}

/// Fetch metadata for one file.
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File details", body = FileDetailsResponse),
        (status = 404, description = "File not found", body = AppError)
    ),
    tag = "files"
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FileDetailsResponse>, AppError> {
    let row = file::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;
    Ok(Json(to_details(row)))
}

/// Stream a file's bytes back to the caller, counting the download.
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File contents"),
        (status = 404, description = "File not found", body = AppError),
        (status = 503, description = "Storage unavailable", body = AppError)
    ),
    tag = "files"
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = file::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    match state.store.exists(&row.storage_key).await {
        Ok(true) => {}
        Ok(false) => {
            // Metadata and blob have diverged; same 404 to the caller,
            // different cause in the logs.
            tracing::error!(file_id = %id, storage_key = %row.storage_key, "metadata exists but blob is missing");
            return Err(AppError::not_found("File not found"));
        }
        Err(e) => return Err(AppError::upstream_unavailable(e)),
    }

    let bytes = state
        .store
        .get(&row.storage_key)
        .await
        .map_err(AppError::upstream_unavailable)?;

    if let Err(e) = file::record_download(&state.pool, id).await {
        tracing::warn!(file_id = %id, error = %e, "failed to record download");
    }

    let mut headers = HeaderMap::new();
    if let Ok(value) = row.mimetype.parse() {
        headers.insert(CONTENT_TYPE, value);
    }
    let disposition = format!(
        "attachment; filename=\"{}\"",
        row.original_name.replace(['"', '\r', '\n'], "_")
    );
    if let Ok(value) = disposition.parse() {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    Ok((headers, bytes))
}

/// Remove a file's binary and metadata. Files still referenced by a
/// draft cannot be deleted; repeating a delete reports NotFound.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File deleted"),
        (status = 404, description = "File not found", body = AppError),
        (status = 409, description = "File referenced by a draft", body = AppError),
        (status = 503, description = "Storage unavailable", body = AppError)
    ),
    tag = "files"
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if draft::references_file(&state.pool, id).await? {
        return Err(AppError::conflict(
            "File is attached to a draft and cannot be deleted",
        ));
    }

    let row = file::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    // Binary goes first; if storage refuses, the metadata stays so the
    // delete can be retried.
    state
        .store
        .delete(&row.storage_key)
        .await
        .map_err(AppError::upstream_unavailable)?;

    if !file::delete(&state.pool, id).await? {
        return Err(AppError::not_found("File not found"));
    }

    tracing::info!(file_id = %id, "file deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}
