use std::path::PathBuf;
use std::time::Duration;

use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::ServerSideEncryption,
    Client,
};
use tokio::io::AsyncWriteExt;

/// Ceiling on any single blob operation. Slow or hung storage surfaces
/// as an upstream error instead of stalling the request.
const BLOB_IO_TIMEOUT: Duration = Duration::from_secs(30);

fn env_or(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .or_else(|_| std::env::var(fallback))
        .ok()
}

/// Bucket name for uploaded filing documents (from env or default).
fn uploads_bucket() -> String {
    std::env::var("UPLOADS_BUCKET").unwrap_or_else(|_| "efiling-uploads".to_string())
}

// ── Trait ────────────────────────────────────────────────────────────

/// Blob operations for uploaded filing documents.
#[allow(async_fn_in_trait)]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under a key.
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String>;

    /// Fetch the full blob.
    async fn get(&self, key: &str) -> Result<Vec<u8>, String>;

    /// Remove a blob. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), String>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> Result<bool, String>;
}

// ── Disk implementation ─────────────────────────────────────────────

/// Local-filesystem store rooted at the uploads directory. The default
/// backend; suitable for single-node deployments.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn from_env() -> Self {
        let root = std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string());
        Self { root: PathBuf::from(root) }
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ObjectStore for DiskStore {
    async fn put(&self, key: &str, _content_type: &str, body: Vec<u8>) -> Result<(), String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| format!("Failed to create uploads dir: {}", e))?;
        let path = self.path_for(key);
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
        file.write_all(&body)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        file.flush()
            .await
            .map_err(|e| format!("Failed to flush {}: {}", path.display(), e))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        let path = self.path_for(key);
        tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to delete {}: {}", path.display(), e)),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, String> {
        Ok(tokio::fs::try_exists(self.path_for(key))
            .await
            .unwrap_or(false))
    }
}

// ── S3 implementation ───────────────────────────────────────────────

/// S3-compatible object store backed by RustFS/MinIO.
/// All uploads are encrypted with SSE-S3 (AES256).
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a new S3Store from environment variables.
    pub fn from_env() -> Self {
        let endpoint = env_or("AWS_ENDPOINT_URL_S3", "S3_ENDPOINT")
            .expect("AWS_ENDPOINT_URL_S3 or S3_ENDPOINT must be set");
        let access_key = env_or("AWS_ACCESS_KEY_ID", "S3_ACCESS_KEY")
            .expect("AWS_ACCESS_KEY_ID or S3_ACCESS_KEY must be set");
        let secret_key = env_or("AWS_SECRET_ACCESS_KEY", "S3_SECRET_KEY")
            .expect("AWS_SECRET_ACCESS_KEY or S3_SECRET_KEY must be set");
        let region =
            env_or("AWS_REGION", "S3_REGION").unwrap_or_else(|| "us-east-1".to_string());

        let creds = Credentials::new(&access_key, &secret_key, None, None, "env");

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(&endpoint)
            .region(Region::new(region))
            .credentials_provider(creds)
            .force_path_style(true)
            .behavior_version_latest()
            .build();

        Self {
            client: Client::from_conf(config),
            bucket: uploads_bucket(),
        }
    }

    /// Ensure the uploads bucket exists (no public-read policy).
    pub async fn ensure_bucket(&self) {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok();

        if !exists {
            tracing::info!("Creating uploads bucket '{}'...", self.bucket);
            match self.client.create_bucket().bucket(&self.bucket).send().await {
                Ok(_) => tracing::info!("Uploads bucket '{}' created", self.bucket),
                Err(e) => {
                    tracing::warn!("Failed to create uploads bucket '{}': {}", self.bucket, e)
                }
            }
        }
    }
}

impl ObjectStore for S3Store {
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let svc = e.into_service_error();
                tracing::error!("S3 PutObject failed for key '{}': {:?}", key, svc);
                format!("S3 upload failed: {}", svc)
            })?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let svc = e.into_service_error();
                tracing::error!("S3 GetObject failed for key '{}': {:?}", key, svc);
                format!("S3 download failed: {}", svc)
            })?;

        resp.body
            .collect()
            .await
            .map(|data| data.into_bytes().to_vec())
            .map_err(|e| format!("Failed to read S3 response body: {}", e))
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| format!("DELETE failed: {}", e))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, String> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let svc_err = e.into_service_error();
                if svc_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(format!("HEAD failed: {}", svc_err))
                }
            }
        }
    }
}

// ── Backend selection ───────────────────────────────────────────────

/// Concrete store selected at startup from the `s3` feature flag.
/// Every call runs under [`BLOB_IO_TIMEOUT`].
pub enum BlobStore {
    Disk(DiskStore),
    S3(S3Store),
}

impl BlobStore {
    pub async fn from_flags() -> Self {
        if crate::config::feature_flags().s3 {
            let store = S3Store::from_env();
            store.ensure_bucket().await;
            BlobStore::S3(store)
        } else {
            BlobStore::Disk(DiskStore::from_env())
        }
    }

    async fn timed<T>(
        fut: impl std::future::Future<Output = Result<T, String>>,
    ) -> Result<T, String> {
        tokio::time::timeout(BLOB_IO_TIMEOUT, fut)
            .await
            .map_err(|_| "Storage operation timed out".to_string())?
    }

    pub async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String> {
        match self {
            BlobStore::Disk(s) => Self::timed(s.put(key, content_type, body)).await,
            BlobStore::S3(s) => Self::timed(s.put(key, content_type, body)).await,
        }
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        match self {
            BlobStore::Disk(s) => Self::timed(s.get(key)).await,
            BlobStore::S3(s) => Self::timed(s.get(key)).await,
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), String> {
        match self {
            BlobStore::Disk(s) => Self::timed(s.delete(key)).await,
            BlobStore::S3(s) => Self::timed(s.delete(key)).await,
        }
    }

    pub async fn exists(&self, key: &str) -> Result<bool, String> {
        match self {
            BlobStore::Disk(s) => Self::timed(s.exists(key)).await,
            BlobStore::S3(s) => Self::timed(s.exists(key)).await,
        }
    }
}
