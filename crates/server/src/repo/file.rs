use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared_types::AppError;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// A single row from the `files` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRow {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub storage_key: String,
    pub size: i64,
    pub mimetype: String,
    pub file_type: String,
    pub category: Option<String>,
    pub filing_type: Option<String>,
    pub court_level: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub checksum: String,
    pub status: String,
    pub uploaded_by: Option<String>,
    pub download_count: i64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub upload_date: DateTime<Utc>,
}

/// Fields for a freshly stored file.
#[derive(Debug)]
pub struct NewFile<'a> {
    pub filename: &'a str,
    pub original_name: &'a str,
    pub storage_key: &'a str,
    pub size: i64,
    pub mimetype: &'a str,
    pub file_type: &'a str,
    pub category: Option<&'a str>,
    pub filing_type: Option<&'a str>,
    pub court_level: Option<&'a str>,
    pub description: Option<&'a str>,
    pub tags: &'a [String],
    pub checksum: &'a str,
    pub uploaded_by: Option<&'a str>,
}

const FILE_COLUMNS: &str = "id, filename, original_name, storage_key, size, mimetype, \
    file_type, category, filing_type, court_level, description, tags, checksum, status, \
    uploaded_by, download_count, last_accessed, upload_date";

pub async fn insert(pool: &Pool<Postgres>, file: NewFile<'_>) -> Result<FileRow, AppError> {
    let sql = format!(
        "INSERT INTO files \
            (filename, original_name, storage_key, size, mimetype, file_type, category, \
             filing_type, court_level, description, tags, checksum, uploaded_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {FILE_COLUMNS}"
    );
    sqlx::query_as::<_, FileRow>(&sql)
        .bind(file.filename)
        .bind(file.original_name)
        .bind(file.storage_key)
        .bind(file.size)
        .bind(file.mimetype)
        .bind(file.file_type)
        .bind(file.category)
        .bind(file.filing_type)
        .bind(file.court_level)
        .bind(file.description)
        .bind(file.tags)
        .bind(file.checksum)
        .bind(file.uploaded_by)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn get(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<FileRow>, AppError> {
    let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE id = $1");
    sqlx::query_as::<_, FileRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Bump the download counter and access timestamp. Failure here is
/// logged by the caller, never surfaced to the downloader.
pub async fn record_download(pool: &Pool<Postgres>, id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE files SET download_count = download_count + 1, last_accessed = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Remove a file record. Returns true if a row went away. Also used to
/// roll back a metadata row whose blob write failed mid-batch.
pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM files WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() > 0)
}

/// Current status for each of the given file IDs. IDs with no row are
/// absent from the map, which is how dangling attachment references
/// show up.
pub async fn statuses_for(
    pool: &Pool<Postgres>,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, String>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, String)> =
        sqlx::query_as("SELECT id, status FROM files WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
    Ok(rows.into_iter().collect())
}

/// Aggregate totals over stored files.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalyticsTotals {
    pub total_files: i64,
    pub total_size: i64,
    pub average_size: i64,
    pub total_downloads: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TypeRow {
    pub file_type: String,
    pub count: i64,
    pub total_size: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusRow {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentRow {
    pub id: Uuid,
    pub original_name: String,
    pub file_type: String,
    pub size: i64,
    pub status: String,
    pub upload_date: DateTime<Utc>,
}

/// Everything the analytics endpoint reports in one place.
#[derive(Debug, Clone)]
pub struct Analytics {
    pub totals: AnalyticsTotals,
    pub types: Vec<TypeRow>,
    pub statuses: Vec<StatusRow>,
    pub categories: Vec<CategoryRow>,
    pub recent: Vec<RecentRow>,
}

pub async fn analytics(pool: &Pool<Postgres>) -> Result<Analytics, AppError> {
    let totals = sqlx::query_as::<_, AnalyticsTotals>(
        "SELECT COUNT(*) AS total_files, \
                COALESCE(SUM(size), 0)::bigint AS total_size, \
                COALESCE(AVG(size), 0)::bigint AS average_size, \
                COALESCE(SUM(download_count), 0)::bigint AS total_downloads \
         FROM files",
    )
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let types = sqlx::query_as::<_, TypeRow>(
        "SELECT file_type, COUNT(*) AS count, COALESCE(SUM(size), 0)::bigint AS total_size \
         FROM files \
         GROUP BY file_type \
         ORDER BY count DESC, file_type ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let statuses = sqlx::query_as::<_, StatusRow>(
        "SELECT status, COUNT(*) AS count \
         FROM files \
         GROUP BY status \
         ORDER BY count DESC, status ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let categories = sqlx::query_as::<_, CategoryRow>(
        "SELECT COALESCE(category, 'uncategorized') AS category, COUNT(*) AS count \
         FROM files \
         GROUP BY 1 \
         ORDER BY count DESC, category ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let recent = sqlx::query_as::<_, RecentRow>(
        "SELECT id, original_name, file_type, size, status, upload_date \
         FROM files \
         ORDER BY upload_date DESC \
         LIMIT 10",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(Analytics {
        totals,
        types,
        statuses,
        categories,
        recent,
    })
}
