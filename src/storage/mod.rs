//! Object storage for generated assets.
//!
//! A thin wrapper around an S3-compatible bucket. Storage is an optional
//! facility: when the endpoint or credentials are missing the feature is
//! simply disabled, and both transfer directions answer "not available"
//! instead of failing hard. Upload problems are logged and swallowed so a
//! slide operation never fails because a mirror copy could not be made.
//!
//! The process holds a single lazily-built client, initialized once from
//! configuration and shared behind an `Arc`.

use std::path::{Path, PathBuf};

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::sync::OnceCell;
use tracing::warn;

/// Settings for the object-storage connection.
///
/// Field names mirror the `OBJECT_STORAGE_*` environment variables; see
/// [`crate::config::Config`].
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl StorageConfig {
    /// Whether enough settings are present to build a client.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
            && self.bucket.is_some()
            && self.access_key_id.is_some()
            && self.secret_access_key.is_some()
    }
}

/// Handle to the configured bucket.
pub struct ObjectStorage {
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

static STORAGE: OnceCell<Option<std::sync::Arc<ObjectStorage>>> = OnceCell::const_new();

impl ObjectStorage {
    /// Initialize the process-wide handle once and return it.
    ///
    /// Returns `None` when storage is not configured; later calls reuse the
    /// first result regardless of the config passed.
    pub async fn initialize(config: &StorageConfig) -> Option<std::sync::Arc<ObjectStorage>> {
        STORAGE
            .get_or_init(|| async {
                if !config.is_configured() {
                    return None;
                }
                Some(std::sync::Arc::new(Self::connect(config).await))
            })
            .await
            .clone()
    }

    /// The initialized global handle, if any.
    pub fn global() -> Option<std::sync::Arc<ObjectStorage>> {
        STORAGE.get().cloned().flatten()
    }

    /// Build a client directly, bypassing the global cell. `config` must be
    /// complete (see [`StorageConfig::is_configured`]).
    pub async fn connect(config: &StorageConfig) -> ObjectStorage {
        let region = aws_config::Region::new(config.region.clone());
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "deck-composer-config",
            ));
        }

        let sdk_config = loader.load().await;

        // S3-compatible services (MinIO etc.) want path-style addressing
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        ObjectStorage {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone().unwrap_or_default(),
            prefix: config.prefix.clone(),
        }
    }

    /// Build the object key `<prefix>/<hint>/<filename>`, skipping absent
    /// parts.
    fn object_key(&self, local_path: &Path, key_hint: Option<&str>) -> Option<String> {
        let filename = local_path.file_name()?.to_str()?;
        let mut parts: Vec<&str> = Vec::new();
        if let Some(prefix) = self.prefix.as_deref() {
            let trimmed = prefix.trim_matches('/');
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
        if let Some(hint) = key_hint {
            let trimmed = hint.trim_matches('/');
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
        parts.push(filename);
        Some(parts.join("/"))
    }

    /// Upload a local file, returning the object key it can be fetched
    /// under, or `None` when the upload could not be made.
    pub async fn put(&self, local_path: &Path, key_hint: Option<&str>) -> Option<String> {
        let key = self.object_key(local_path, key_hint)?;

        let body = match ByteStream::from_path(local_path).await {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to read {} for upload: {e}", local_path.display());
                return None;
            }
        };

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body);
        if let Some(content_type) = mime_guess::from_path(local_path).first_raw() {
            request = request.content_type(content_type);
        }

        match request.send().await {
            Ok(_) => Some(key),
            Err(e) => {
                warn!("failed to upload {} to object storage: {e}", key);
                None
            }
        }
    }

    /// Download an object into `local_path`, returning the path on success.
    pub async fn get(&self, object_key: &str, local_path: &Path) -> Option<PathBuf> {
        let object = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key)
            .send()
            .await
        {
            Ok(object) => object,
            Err(e) => {
                warn!("failed to fetch {} from object storage: {e}", object_key);
                return None;
            }
        };

        let bytes = match object.body.collect().await {
            Ok(data) => data.into_bytes(),
            Err(e) => {
                warn!("failed to read body of {}: {e}", object_key);
                return None;
            }
        };

        if let Some(parent) = local_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("failed to create {}: {e}", parent.display());
                return None;
            }
        }
        if let Err(e) = tokio::fs::write(local_path, &bytes).await {
            warn!("failed to write {}: {e}", local_path.display());
            return None;
        }
        Some(local_path.to_path_buf())
    }
}
