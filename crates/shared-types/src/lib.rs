pub mod common;
pub mod draft;
pub mod error;
pub mod feature_flags;
pub mod file;
pub mod payment;

pub use common::{normalize_pagination, PaginationMeta};
pub use draft::{
    CourtLevel, DraftAttachment, DraftResponse, DraftStatus, DraftSummary, FilingType,
    ListDraftsResponse, ResolvedAttachment, SaveDraftRequest, SubmitDraftResponse,
};
pub use error::{AppError, AppErrorKind};
pub use feature_flags::{AppConfig, FeatureFlags};
pub use file::{
    file_extension, is_allowed_mime_type, is_valid_category, readable_size, CategoryBreakdown,
    FileAnalyticsResponse, FileDetailsResponse, FileKind, FileStatus, RecentUpload,
    StatusBreakdown, TypeBreakdown, UploadError, UploadResponse, UploadSummary, UploadedFileInfo,
    ALLOWED_MIME_TYPES, FILE_CATEGORIES, MAX_BATCH_FILES, MAX_DESCRIPTION_LEN, MAX_FILE_SIZE,
};
pub use payment::{
    CreateOrderRequest, PaymentCallbackRequest, PaymentOrderResponse, PaymentOrderStatus,
    PaymentSuccessResponse,
};
