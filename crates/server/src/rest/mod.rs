pub mod draft;
pub mod file;
pub mod payment;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::db::AppState;

/// Whole-request ceiling for the multipart upload route: ten files at
/// the per-file limit plus form overhead.
const UPLOAD_BODY_LIMIT: usize = 105 * 1024 * 1024;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Drafts
        .route(
            "/api/efiling/drafts",
            get(draft::list_drafts).post(draft::save_draft),
        )
        .route(
            "/api/efiling/drafts/{draft_id}",
            get(draft::get_draft).delete(draft::delete_draft),
        )
        .route(
            "/api/efiling/drafts/{draft_id}/submit",
            post(draft::submit_draft),
        )
        // Files
        .route(
            "/api/files",
            post(file::upload_files).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/files/analytics/summary", get(file::file_analytics))
        .route(
            "/api/files/{id}",
            get(file::get_file).delete(file::delete_file),
        )
        .route("/api/files/{id}/download", get(file::download_file))
        // Payments
        .route("/api/payments/orders", post(payment::create_order))
        .route("/api/payments/callback", post(payment::payment_callback))
}
