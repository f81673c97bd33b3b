//! HTTP-backed image fetcher.
//!
//! The image service generates the file onto shared storage and answers
//! with its local path; the asset record is built from that response.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::GenerationError;
use crate::model::{ImageAsset, ImagePrompt};

use super::ImageFetcher;

/// JSON-over-HTTP implementation of [`ImageFetcher`].
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ImageResponse {
    path: String,
    #[serde(default)]
    extras: Option<Value>,
}

impl HttpImageFetcher {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, prompt: &ImagePrompt) -> Result<ImageAsset, GenerationError> {
        let url = self
            .base_url
            .join("v1/image")
            .map_err(|e| GenerationError::Upstream(format!("invalid image endpoint: {e}")))?;

        let response = self
            .client
            .post(url)
            .json(prompt)
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream(format!(
                "image fetch returned {status}: {detail}"
            )));
        }

        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        if body.path.is_empty() {
            return Err(GenerationError::EmptyResult { what: "image path" });
        }

        Ok(ImageAsset::new(body.path, body.extras))
    }
}
