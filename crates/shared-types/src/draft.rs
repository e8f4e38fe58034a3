use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::PaginationMeta;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Court level a filing is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CourtLevel {
    Supreme,
    High,
    District,
    Subordinate,
}

impl CourtLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtLevel::Supreme => "supreme",
            CourtLevel::High => "high",
            CourtLevel::District => "district",
            CourtLevel::Subordinate => "subordinate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "supreme" => Some(CourtLevel::Supreme),
            "high" => Some(CourtLevel::High),
            "district" => Some(CourtLevel::District),
            "subordinate" => Some(CourtLevel::Subordinate),
            _ => None,
        }
    }
}

/// Type of filing being prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FilingType {
    Petition,
    Appeal,
    Application,
    Complaint,
    Bail,
    Revision,
}

impl FilingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingType::Petition => "petition",
            FilingType::Appeal => "appeal",
            FilingType::Application => "application",
            FilingType::Complaint => "complaint",
            FilingType::Bail => "bail",
            FilingType::Revision => "revision",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "petition" => Some(FilingType::Petition),
            "appeal" => Some(FilingType::Appeal),
            "application" => Some(FilingType::Application),
            "complaint" => Some(FilingType::Complaint),
            "bail" => Some(FilingType::Bail),
            "revision" => Some(FilingType::Revision),
            _ => None,
        }
    }
}

/// Lifecycle status of an eFiling draft.
///
/// Transitions run strictly forward: draft -> submitted -> paid ->
/// processed. `submitted` is reached by an explicit submit call, `paid`
/// only through payment reconciliation, and `processed` is an
/// administrative action with no handler in this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Submitted,
    Paid,
    Processed,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Draft => "draft",
            DraftStatus::Submitted => "submitted",
            DraftStatus::Paid => "paid",
            DraftStatus::Processed => "processed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(DraftStatus::Draft),
            "submitted" => Some(DraftStatus::Submitted),
            "paid" => Some(DraftStatus::Paid),
            "processed" => Some(DraftStatus::Processed),
            _ => None,
        }
    }

    /// Whether the single-step forward transition to `next` is legal.
    /// No back-transitions are modeled.
    pub fn can_transition_to(self, next: DraftStatus) -> bool {
        matches!(
            (self, next),
            (DraftStatus::Draft, DraftStatus::Submitted)
                | (DraftStatus::Submitted, DraftStatus::Paid)
                | (DraftStatus::Paid, DraftStatus::Processed)
        )
    }
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// One entry in a draft's ordered attachment list.
///
/// `file_id` is a weak reference into the file store: deleting the file
/// record does not touch the draft, and deleting the draft does not
/// touch the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DraftAttachment {
    pub file_id: Uuid,
    pub file_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub upload_date: DateTime<Utc>,
}

/// An attachment entry joined against the live file store record.
/// `file_status` is None when the referenced file no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResolvedAttachment {
    #[serde(flatten)]
    pub attachment: DraftAttachment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Request/Response DTOs
// ---------------------------------------------------------------------------

/// Request body for creating or updating a draft.
///
/// Supplying `draft_id` updates an existing draft; omitting it creates
/// a new one. A `partial` save (autosave) allows every field to be
/// blank as long as at least one carries a value; a full save requires
/// the seven core fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct SaveDraftRequest {
    #[serde(default)]
    pub draft_id: Option<String>,
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub court_level: Option<CourtLevel>,
    #[serde(default)]
    pub filing_type: Option<FilingType>,
    #[serde(default)]
    pub petitioner_name: Option<String>,
    #[serde(default)]
    pub respondent_name: Option<String>,
    #[serde(default)]
    pub case_subject: Option<String>,
    #[serde(default)]
    pub advocate_name: Option<String>,
    #[serde(default)]
    pub enrollment_number: Option<String>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Invalid email address"))
    )]
    pub email: Option<String>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(custom(function = "validate_phone"))
    )]
    pub phone: Option<String>,
    #[serde(default)]
    pub uploaded_files: Option<Vec<DraftAttachment>>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))
    )]
    pub notes: Option<String>,
}

#[cfg(feature = "validation")]
fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    let well_formed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if well_formed && (7..=15).contains(&digits) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some("Invalid phone number".into());
        Err(err)
    }
}

/// Full draft projection returned by save and get.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DraftResponse {
    pub draft_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
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
    pub uploaded_files: Vec<ResolvedAttachment>,
    pub estimated_fee: i64,
    pub service_charge: i64,
    pub total_amount: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_reference: Option<String>,
    pub notes: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Summary projection used by the draft list (no attachment payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DraftSummary {
    pub draft_id: String,
    pub court_level: Option<String>,
    pub filing_type: Option<String>,
    pub petitioner_name: Option<String>,
    pub case_subject: Option<String>,
    pub status: String,
    pub total_amount: i64,
    /// Number of attached files.
    pub uploaded_files: i64,
    pub last_modified: DateTime<Utc>,
    pub days_since_modified: i64,
    pub created_at: DateTime<Utc>,
}

/// Paginated draft list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListDraftsResponse {
    pub drafts: Vec<DraftSummary>,
    pub pagination: PaginationMeta,
}

/// Result of submitting a draft for processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmitDraftResponse {
    pub filing_reference: String,
    pub draft_id: String,
    pub status: String,
    pub total_amount: i64,
}
