use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::health::HealthResponse;
use crate::rest;
use shared_types::{
    AppError, AppErrorKind, CategoryBreakdown, CourtLevel, CreateOrderRequest, DraftAttachment,
    DraftResponse, DraftStatus, DraftSummary, FileAnalyticsResponse, FileDetailsResponse,
    FileKind, FileStatus, FilingType, ListDraftsResponse, PaginationMeta,
    PaymentCallbackRequest, PaymentOrderResponse, PaymentOrderStatus, PaymentSuccessResponse,
    RecentUpload, ResolvedAttachment, SaveDraftRequest, StatusBreakdown, SubmitDraftResponse,
    TypeBreakdown, UploadError, UploadResponse, UploadSummary, UploadedFileInfo,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Citizen eFiling Portal API",
        description = "Draft, pay for, and submit court filings",
        version = env!("CARGO_PKG_VERSION")
    ),
    paths(
        crate::health::health_check,
        rest::draft::save_draft,
        rest::draft::list_drafts,
        rest::draft::get_draft,
        rest::draft::delete_draft,
        rest::draft::submit_draft,
        rest::file::upload_files,
        rest::file::file_analytics,
        rest::file::get_file,
        rest::file::download_file,
        rest::file::delete_file,
        rest::payment::create_order,
        rest::payment::payment_callback,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        CourtLevel,
        FilingType,
        DraftStatus,
        DraftAttachment,
        ResolvedAttachment,
        SaveDraftRequest,
        DraftResponse,
        DraftSummary,
        ListDraftsResponse,
        SubmitDraftResponse,
        PaginationMeta,
        FileStatus,
        FileKind,
        UploadedFileInfo,
        UploadError,
        UploadSummary,
        UploadResponse,
        FileDetailsResponse,
        TypeBreakdown,
        StatusBreakdown,
        CategoryBreakdown,
        RecentUpload,
        FileAnalyticsResponse,
        PaymentOrderStatus,
        CreateOrderRequest,
        PaymentOrderResponse,
        PaymentCallbackRequest,
        PaymentSuccessResponse,
        HealthResponse,
    )),
    tags(
        (name = "drafts", description = "eFiling draft lifecycle"),
        (name = "files", description = "Filing document storage"),
        (name = "payments", description = "Court-fee payment"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document at
/// /api-docs/openapi.json. Wired in only when the flag is on.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
