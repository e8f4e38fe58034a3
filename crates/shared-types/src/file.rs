use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum size of a single uploaded file in bytes (10 MiB).
pub const MAX_FILE_SIZE: i64 = 10 * 1024 * 1024;

/// Maximum number of files accepted in one upload batch.
pub const MAX_BATCH_FILES: usize = 10;

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
    "image/jpg",
    "text/plain",
];

pub fn is_allowed_mime_type(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Document categories a filer can declare at upload.
pub const FILE_CATEGORIES: &[&str] = &[
    "petition",
    "affidavit",
    "evidence",
    "citation",
    "identity",
    "certificate",
    "other",
];

pub fn is_valid_category(category: &str) -> bool {
    FILE_CATEGORIES.contains(&category)
}

/// Longest declared description accepted at upload, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Processing status of a stored file. New uploads start at `uploaded`;
/// the later states belong to the clerk-side verification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Uploaded,
    Processing,
    Verified,
    Rejected,
    Archived,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Uploaded => "uploaded",
            FileStatus::Processing => "processing",
            FileStatus::Verified => "verified",
            FileStatus::Rejected => "rejected",
            FileStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploaded" => Some(FileStatus::Uploaded),
            "processing" => Some(FileStatus::Processing),
            "verified" => Some(FileStatus::Verified),
            "rejected" => Some(FileStatus::Rejected),
            "archived" => Some(FileStatus::Archived),
            _ => None,
        }
    }
}

/// Coarse type derived from the MIME type whenever the mimetype is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Document,
    Other,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Document => "document",
            FileKind::Other => "other",
        }
    }

    /// Classify a MIME type. Checks run in order: image prefix, exact
    /// PDF, then a substring match for document-like types.
    pub fn classify(mime: &str) -> Self {
        if mime.starts_with("image/") {
            FileKind::Image
        } else if mime == "application/pdf" {
            FileKind::Pdf
        } else if mime.contains("document") || mime.contains("text") {
            FileKind::Document
        } else {
            FileKind::Other
        }
    }
}

/// Render a byte count as a human-readable size with two decimals.
pub fn readable_size(bytes: i64) -> String {
    let bytes = bytes.max(0) as f64;
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;
    let (value, unit) = if bytes >= GB {
        (bytes / GB, "GB")
    } else if bytes >= MB {
        (bytes / MB, "MB")
    } else if bytes >= KB {
        (bytes / KB, "KB")
    } else {
        return format!("{} Bytes", bytes as i64);
    };
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, unit)
}

/// Extract the extension (with leading dot) from a file name, or the
/// empty string when there is none.
pub fn file_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!(".{}", ext.to_lowercase())
        }
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Metadata for one successfully stored file, as returned by the upload
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadedFileInfo {
    pub id: Uuid,
    /// Generated storage name.
    pub filename: String,
    pub original_name: String,
    pub size: i64,
    pub readable_size: String,
    /// Classified type derived from the mimetype.
    pub file_type: String,
    pub status: String,
    pub upload_date: DateTime<Utc>,
}

/// One per-file failure within an otherwise accepted upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadError {
    pub original_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Response body of the multipart upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadResponse {
    pub files: Vec<UploadedFileInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<UploadError>,
    pub summary: UploadSummary,
}

/// Detail projection for a single file. Storage paths and checksums are
/// internal and never leave the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FileDetailsResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub extension: String,
    pub size: i64,
    pub readable_size: String,
    pub mimetype: String,
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    pub status: String,
    pub download_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    pub upload_date: DateTime<Utc>,
    pub days_since_upload: i64,
}

/// Per-type breakdown in the analytics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TypeBreakdown {
    pub file_type: String,
    pub count: i64,
    pub total_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusBreakdown {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: i64,
}

/// Short projection of one of the newest uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecentUpload {
    pub id: Uuid,
    pub original_name: String,
    pub file_type: String,
    pub size: i64,
    pub status: String,
    pub upload_date: DateTime<Utc>,
    pub days_since_upload: i64,
}

/// Aggregate statistics over stored files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FileAnalyticsResponse {
    pub total_files: i64,
    pub total_size: i64,
    pub readable_total_size: String,
    pub average_size: i64,
    pub total_downloads: i64,
    pub types: Vec<TypeBreakdown>,
    pub statuses: Vec<StatusBreakdown>,
    pub categories: Vec<CategoryBreakdown>,
    pub recent_uploads: Vec<RecentUpload>,
}
