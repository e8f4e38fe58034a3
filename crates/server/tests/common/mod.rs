use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use server::db::AppState;
use server::payment::HmacSha256Verifier;
use server::storage::{BlobStore, DiskStore};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tower::ServiceExt;

/// Tables to truncate before each test run (child tables before parents).
const ALL_TABLES: &str = "payment_orders, files, drafts";

/// HMAC secret wired into the test verifier.
pub const TEST_PAYMENT_SECRET: &[u8] = b"test-payment-secret";

/// One-time flag to ensure we only set up the test database once per process.
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Set up the test database and override DATABASE_URL so all subsequent pool
/// creation uses the `_test` database instead of the main one.
async fn ensure_test_db() {
    let _ = dotenvy::dotenv();
    let original_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    // Derive test database name
    let (base_url, db_name) = original_url
        .rsplit_once('/')
        .expect("DATABASE_URL must contain a database name");
    let test_db_name = format!("{}_test", db_name);
    let test_url = format!("{}/{}", base_url, test_db_name);

    // Connect to `postgres` to create the test database if needed
    let admin_url = format!("{}/postgres", base_url);
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres admin database");

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&test_db_name)
            .fetch_one(&admin_pool)
            .await
            .expect("Failed to check for test database");

    if !exists {
        sqlx::query(&format!("CREATE DATABASE \"{}\"", test_db_name))
            .execute(&admin_pool)
            .await
            .expect("Failed to create test database");
    }

    admin_pool.close().await;

    // Point DATABASE_URL to the test database for all future pool creation
    std::env::set_var("DATABASE_URL", &test_url);
}

/// Build a pool connected to the test database.
/// On the first call, creates the database, runs migrations, and truncates all tables.
async fn test_pool() -> Pool<Postgres> {
    if INITIALIZED.get().is_none() {
        ensure_test_db().await;
    }

    // Use the same pool creation as production (connect_lazy)
    let pool = server::db::create_pool();

    // First call: run migrations + truncate
    if INITIALIZED.set(()).is_ok() {
        server::db::run_migrations(&pool).await;

        sqlx::query(&format!("TRUNCATE {} CASCADE", ALL_TABLES))
            .execute(&pool)
            .await
            .expect("Failed to truncate test tables");
    }

    pool
}

/// Blob root shared across tests in this process.
fn uploads_root() -> PathBuf {
    static ROOT: OnceLock<PathBuf> = OnceLock::new();
    ROOT.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("efiling-tests-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Failed to create uploads dir");
        dir
    })
    .clone()
}

#[allow(dead_code)]
/// Build a test router with the REST API routes, a disk blob store in a
/// temp directory, and the HMAC verifier keyed with TEST_PAYMENT_SECRET.
pub async fn test_app() -> Router {
    let pool = test_pool().await;
    let state = AppState {
        pool,
        store: Arc::new(BlobStore::Disk(DiskStore::at(uploads_root()))),
        verifier: Arc::new(HmacSha256Verifier::new(TEST_PAYMENT_SECRET.to_vec())),
    };

    server::rest::api_router()
        .route("/health", axum::routing::get(server::health::health_check))
        .with_state(state)
}

#[allow(dead_code)]
/// Compute a valid callback signature for the test verifier.
pub fn sign(order_id: &str, payment_id: &str) -> String {
    server::payment::sign(TEST_PAYMENT_SECRET, order_id, payment_id)
}

async fn run(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[allow(dead_code)]
/// Helper to make a GET request as a given user and return (status, body).
pub async fn get_as(app: &Router, uri: &str, user: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap();
    run(app, request).await
}

#[allow(dead_code)]
/// Helper to make a POST request with JSON body as a given user.
pub async fn post_json_as(app: &Router, uri: &str, json: &str, user: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-user-id", user)
        .body(Body::from(json.to_string()))
        .unwrap();
    run(app, request).await
}

#[allow(dead_code)]
/// Helper to make a POST request with JSON body and no user header.
pub async fn post_json(app: &Router, uri: &str, json: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    run(app, request).await
}

#[allow(dead_code)]
/// Helper to make a DELETE request as a given user.
pub async fn delete_as(app: &Router, uri: &str, user: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap();
    run(app, request).await
}

/// Declared metadata fields every well-formed upload carries.
pub const DEFAULT_UPLOAD_META: &[(&str, &str)] = &[
    ("filing_type", "petition"),
    ("court_level", "supreme"),
    ("category", "petition"),
];

#[allow(dead_code)]
/// Upload one or more files with the default declared metadata. Each
/// entry is (filename, content_type, bytes).
pub async fn upload_files(
    app: &Router,
    files: &[(&str, &str, &[u8])],
    user: &str,
) -> (StatusCode, String) {
    upload_files_with(app, files, DEFAULT_UPLOAD_META, user).await
}

#[allow(dead_code)]
/// Upload files with explicit declared-metadata text fields.
pub async fn upload_files_with(
    app: &Router,
    files: &[(&str, &str, &[u8])],
    fields: &[(&str, &str)],
    user: &str,
) -> (StatusCode, String) {
    const BOUNDARY: &str = "efiling-test-boundary";

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (filename, content_type, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/files")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-user-id", user)
        .body(Body::from(body))
        .unwrap();
    run(app, request).await
}
