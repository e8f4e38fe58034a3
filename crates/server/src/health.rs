use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the process start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health probe payload. The row counts double as a check that the
/// schema is migrated and reachable, not just that Postgres answers.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub drafts: i64,
    pub files: i64,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Liveness probe with a round trip through both portal tables.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<Pool<Postgres>>) -> Json<HealthResponse> {
    let counts: Result<(i64, i64), sqlx::Error> =
        sqlx::query_as("SELECT (SELECT COUNT(*) FROM drafts), (SELECT COUNT(*) FROM files)")
            .fetch_one(&pool)
            .await;

    let (status, db, drafts, files) = match counts {
        Ok((drafts, files)) => ("ok".to_string(), "connected".to_string(), drafts, files),
        Err(e) => ("degraded".to_string(), format!("error: {e}"), 0, 0),
    };

    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    Json(HealthResponse {
        status,
        db,
        drafts,
        files,
        uptime_seconds: uptime,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
