//! HTTP-backed generation collaborator.
//!
//! Talks JSON to a generation sidecar. One endpoint per trait method; all
//! requests are POSTs and all failures collapse into [`GenerationError`]
//! without retries (retry policy, if any, belongs to the sidecar).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GenerationError;
use crate::model::{
    DeckLayout, DeckOutline, GenerationOptions, Slide, SlideContent, SlideLayout, SlideOutline,
};

use super::SlideGenerator;

/// JSON-over-HTTP implementation of [`SlideGenerator`].
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGenerator {
    /// Create a generator client against `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a generator client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, GenerationError> {
        self.base_url
            .join(path)
            .map_err(|e| GenerationError::Upstream(format!("invalid endpoint {path}: {e}")))
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, GenerationError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream(format!(
                "{path} returned {status}: {detail}"
            )));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct ContentRequest<'a> {
    layout: &'a SlideLayout,
    outline: &'a SlideOutline,
    #[serde(flatten)]
    options: &'a GenerationOptions,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: SlideContent,
}

#[derive(Serialize)]
struct EditContentRequest<'a> {
    prompt: &'a str,
    slide: &'a Slide,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    layout: &'a SlideLayout,
}

#[derive(Serialize)]
struct EditHtmlRequest<'a> {
    prompt: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct EditHtmlResponse {
    html: String,
}

#[derive(Serialize)]
struct SelectLayoutRequest<'a> {
    prompt: &'a str,
    layout: &'a DeckLayout,
    slide: &'a Slide,
}

#[derive(Deserialize)]
struct SelectLayoutResponse {
    layout: SlideLayout,
}

#[derive(Serialize)]
struct StructureRequest<'a> {
    outline: &'a DeckOutline,
    layout: &'a DeckLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
    single_slide: bool,
}

#[derive(Deserialize)]
struct StructureResponse {
    slides: Vec<usize>,
}

#[async_trait]
impl SlideGenerator for HttpGenerator {
    async fn generate_content(
        &self,
        layout: &SlideLayout,
        outline: &SlideOutline,
        options: &GenerationOptions,
    ) -> Result<SlideContent, GenerationError> {
        let response: ContentResponse = self
            .post(
                "v1/slide/content",
                &ContentRequest {
                    layout,
                    outline,
                    options,
                },
            )
            .await?;
        if response.content.is_empty() {
            return Err(GenerationError::EmptyResult {
                what: "slide content",
            });
        }
        Ok(response.content)
    }

    async fn edit_content(
        &self,
        prompt: &str,
        slide: &Slide,
        language: Option<&str>,
        layout: &SlideLayout,
    ) -> Result<SlideContent, GenerationError> {
        let response: ContentResponse = self
            .post(
                "v1/slide/edit",
                &EditContentRequest {
                    prompt,
                    slide,
                    language,
                    layout,
                },
            )
            .await?;
        if response.content.is_empty() {
            return Err(GenerationError::EmptyResult {
                what: "edited slide content",
            });
        }
        Ok(response.content)
    }

    async fn edit_html(&self, prompt: &str, html: &str) -> Result<String, GenerationError> {
        let response: EditHtmlResponse = self
            .post("v1/slide/edit-html", &EditHtmlRequest { prompt, html })
            .await?;
        if response.html.trim().is_empty() {
            return Err(GenerationError::EmptyResult {
                what: "edited html",
            });
        }
        Ok(response.html)
    }

    async fn select_layout(
        &self,
        prompt: &str,
        layout: &DeckLayout,
        slide: &Slide,
    ) -> Result<SlideLayout, GenerationError> {
        let response: SelectLayoutResponse = self
            .post(
                "v1/layout/select",
                &SelectLayoutRequest {
                    prompt,
                    layout,
                    slide,
                },
            )
            .await?;
        Ok(response.layout)
    }

    async fn generate_structure(
        &self,
        outline: &DeckOutline,
        layout: &DeckLayout,
        instructions: Option<&str>,
        single_slide: bool,
    ) -> Result<Vec<usize>, GenerationError> {
        let response: StructureResponse = self
            .post(
                "v1/structure",
                &StructureRequest {
                    outline,
                    layout,
                    instructions,
                    single_slide,
                },
            )
            .await?;
        Ok(response.slides)
    }
}
