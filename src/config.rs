//! Configuration management for the deck backend.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! Server and collaborator settings use the `DECK_` prefix:
//!
//! - `DECK_HOST` - Server bind address (default: 0.0.0.0)
//! - `DECK_PORT` - Server port (default: 8000)
//! - `DECK_GENERATOR_URL` - Base URL of the generation sidecar (required)
//! - `DECK_IMAGE_SERVICE_URL` - Base URL of the image service (defaults to
//!   the generator URL)
//! - `DECK_CORS_ORIGINS` - Allowed CORS origins, comma-separated
//!
//! Object storage keeps the `OBJECT_STORAGE_*` names shared with the rest
//! of the deployment; leaving them unset disables mirroring entirely:
//!
//! - `OBJECT_STORAGE_ENDPOINT` - S3-compatible endpoint
//! - `OBJECT_STORAGE_BUCKET_NAME` - Bucket for generated assets
//! - `OBJECT_STORAGE_PREFIX` - Key prefix inside the bucket
//! - `OBJECT_STORAGE_REGION` - Region (default: us-east-1, often ignored
//!   by MinIO)
//! - `OBJECT_STORAGE_ACCESS_KEY_ID` / `OBJECT_STORAGE_SECRET_ACCESS_KEY`

use clap::Parser;
use url::Url;

use crate::storage::StorageConfig;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default object-storage region.
pub const DEFAULT_REGION: &str = "us-east-1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// deck-composer - A web backend for AI-assisted slide deck editing.
///
/// Serves the slide collection API, coordinating content generation and
/// asset fetching against external collaborator services.
#[derive(Parser, Debug, Clone)]
#[command(name = "deck-composer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "DECK_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "DECK_PORT")]
    pub port: u16,

    // =========================================================================
    // Collaborator Configuration
    // =========================================================================
    /// Base URL of the generation sidecar (content, layout, structure).
    #[arg(long, env = "DECK_GENERATOR_URL")]
    pub generator_url: String,

    /// Base URL of the image generation/fetch service.
    ///
    /// Defaults to the generator URL when not set.
    #[arg(long, env = "DECK_IMAGE_SERVICE_URL")]
    pub image_service_url: Option<String>,

    // =========================================================================
    // Object Storage Configuration
    // =========================================================================
    /// S3-compatible endpoint for mirroring generated assets.
    ///
    /// Leaving the storage settings unset disables mirroring.
    #[arg(long, env = "OBJECT_STORAGE_ENDPOINT")]
    pub object_storage_endpoint: Option<String>,

    /// Bucket name for generated assets.
    #[arg(long, env = "OBJECT_STORAGE_BUCKET_NAME")]
    pub object_storage_bucket: Option<String>,

    /// Key prefix inside the bucket.
    #[arg(long, env = "OBJECT_STORAGE_PREFIX")]
    pub object_storage_prefix: Option<String>,

    /// Region for the storage endpoint (often ignored by MinIO).
    #[arg(long, default_value = DEFAULT_REGION, env = "OBJECT_STORAGE_REGION")]
    pub object_storage_region: String,

    /// Access key id for the storage endpoint.
    #[arg(long, env = "OBJECT_STORAGE_ACCESS_KEY_ID")]
    pub object_storage_access_key_id: Option<String>,

    /// Secret access key for the storage endpoint.
    #[arg(long, env = "OBJECT_STORAGE_SECRET_ACCESS_KEY")]
    pub object_storage_secret_access_key: Option<String>,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "DECK_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.generator_url.is_empty() {
            return Err(
                "Generator URL is required. Set --generator-url or DECK_GENERATOR_URL".to_string(),
            );
        }
        Url::parse(&self.generator_url)
            .map_err(|e| format!("Invalid generator URL '{}': {e}", self.generator_url))?;

        if let Some(url) = &self.image_service_url {
            Url::parse(url).map_err(|e| format!("Invalid image service URL '{url}': {e}"))?;
        }

        // Object storage is all-or-nothing: a partial configuration is a
        // deployment mistake, not a disabled feature.
        let storage_settings = [
            self.object_storage_endpoint.is_some(),
            self.object_storage_bucket.is_some(),
            self.object_storage_access_key_id.is_some(),
            self.object_storage_secret_access_key.is_some(),
        ];
        let set = storage_settings.iter().filter(|&&s| s).count();
        if set != 0 && set != storage_settings.len() {
            return Err(
                "Object storage is partially configured. Set all of OBJECT_STORAGE_ENDPOINT, \
                 OBJECT_STORAGE_BUCKET_NAME, OBJECT_STORAGE_ACCESS_KEY_ID, and \
                 OBJECT_STORAGE_SECRET_ACCESS_KEY, or none of them"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The generator base URL; call `validate()` first.
    pub fn generator_base_url(&self) -> Result<Url, String> {
        Url::parse(&self.generator_url)
            .map_err(|e| format!("Invalid generator URL '{}': {e}", self.generator_url))
    }

    /// The image service base URL, defaulting to the generator URL.
    pub fn image_service_base_url(&self) -> Result<Url, String> {
        match &self.image_service_url {
            Some(url) => Url::parse(url).map_err(|e| format!("Invalid image service URL: {e}")),
            None => self.generator_base_url(),
        }
    }

    /// The object storage settings in the shape the storage module takes.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            endpoint: self.object_storage_endpoint.clone(),
            bucket: self.object_storage_bucket.clone(),
            prefix: self.object_storage_prefix.clone(),
            region: self.object_storage_region.clone(),
            access_key_id: self.object_storage_access_key_id.clone(),
            secret_access_key: self.object_storage_secret_access_key.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
