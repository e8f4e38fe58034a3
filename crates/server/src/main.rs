use std::sync::Arc;

use axum::routing::get;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use server::db::AppState;
use server::storage::BlobStore;

#[tokio::main]
async fn main() {
    server::telemetry::init();
    server::config::load_feature_flags();
    server::health::record_start_time();

    let pool = server::db::create_pool();
    server::db::run_migrations(&pool).await;

    let store = Arc::new(BlobStore::from_flags().await);
    let verifier = server::payment::verifier_from_flags();
    let state = AppState {
        pool,
        store,
        verifier,
    };

    let mut app = server::rest::api_router()
        .route("/health", get(server::health::health_check));

    if server::config::feature_flags().swagger_ui {
        app = app.merge(server::openapi::swagger_ui());
    }

    let app = app
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .await
        .expect("Server exited with error");
}
