//! Shared utilities for integration tests.
//!
//! Provides stub generation collaborators and helpers for driving the
//! router with in-process requests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use deck_composer::{
    AssetCoordinator, DeckLayout, DeckOutline, DeckService, GenerationError, GenerationOptions,
    ImageAsset, ImageFetcher, ImagePrompt, MemoryStore, RouterConfig, Slide, SlideContent,
    SlideGenerator, SlideLayout, SlideOutline, SPEAKER_NOTE_KEY,
};

// =============================================================================
// Stub collaborators
// =============================================================================

/// Deterministic generation stub.
///
/// Content carries a title derived from the outline, a speaker note, and
/// one image node so the asset path is exercised.
pub struct StubGenerator {
    fail: bool,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn check(&self) -> Result<(), GenerationError> {
        if self.fail {
            Err(GenerationError::Upstream("generator offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SlideGenerator for StubGenerator {
    async fn generate_content(
        &self,
        layout: &SlideLayout,
        outline: &SlideOutline,
        _options: &GenerationOptions,
    ) -> Result<SlideContent, GenerationError> {
        self.check()?;
        let value = json!({
            "title": outline.content,
            "layout_used": layout.id,
            SPEAKER_NOTE_KEY: format!("note: {}", outline.content),
            "hero": {"__image_prompt__": format!("illustration of {}", outline.content)},
        });
        match value {
            Value::Object(map) => Ok(SlideContent(map)),
            _ => unreachable!(),
        }
    }

    async fn edit_content(
        &self,
        prompt: &str,
        _slide: &Slide,
        _language: Option<&str>,
        layout: &SlideLayout,
    ) -> Result<SlideContent, GenerationError> {
        self.check()?;
        let value = json!({
            "title": format!("edited: {prompt}"),
            "layout_used": layout.id,
            SPEAKER_NOTE_KEY: "edited",
        });
        match value {
            Value::Object(map) => Ok(SlideContent(map)),
            _ => unreachable!(),
        }
    }

    async fn edit_html(&self, prompt: &str, html: &str) -> Result<String, GenerationError> {
        self.check()?;
        Ok(format!("<!-- {prompt} -->{html}"))
    }

    async fn select_layout(
        &self,
        _prompt: &str,
        layout: &DeckLayout,
        slide: &Slide,
    ) -> Result<SlideLayout, GenerationError> {
        self.check()?;
        // Keep the slide's current slot when it exists, else the first
        layout
            .slides
            .iter()
            .find(|slot| slot.id == slide.layout)
            .or_else(|| layout.slides.first())
            .cloned()
            .ok_or(GenerationError::EmptyResult { what: "layout" })
    }

    async fn generate_structure(
        &self,
        _outline: &DeckOutline,
        _layout: &DeckLayout,
        _instructions: Option<&str>,
        _single_slide: bool,
    ) -> Result<Vec<usize>, GenerationError> {
        self.check()?;
        Ok(vec![1])
    }
}

/// Image fetch stub returning predictable local paths.
pub struct StubFetcher;

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch(&self, prompt: &ImagePrompt) -> Result<ImageAsset, GenerationError> {
        Ok(ImageAsset::new(
            format!("/tmp/images/{}.png", prompt.prompt.replace(' ', "-")),
            None,
        ))
    }
}

// =============================================================================
// App construction
// =============================================================================

pub type TestDeckService = DeckService<MemoryStore, StubGenerator, StubFetcher>;

/// A router plus direct access to the service behind it.
pub struct TestApp {
    pub router: Router,
    pub service: Arc<TestDeckService>,
}

pub fn test_app() -> TestApp {
    test_app_with(StubGenerator::new())
}

pub fn test_app_with(generator: StubGenerator) -> TestApp {
    let service = Arc::new(DeckService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(generator),
        AssetCoordinator::new(Arc::new(StubFetcher)),
    ));
    let router = create_test_router(Arc::clone(&service));
    TestApp { router, service }
}

fn create_test_router(service: Arc<TestDeckService>) -> Router {
    deck_composer::create_router(service, RouterConfig::new().with_tracing(false))
}

/// The layout used by [`create_presentation`].
pub fn default_layout() -> Value {
    json!({
        "name": "default",
        "ordered": false,
        "slides": [
            {"id": "title"},
            {"id": "body"},
            {"id": "closing"},
        ],
    })
}

// =============================================================================
// Request helpers
// =============================================================================

/// POST a JSON body and return (status, parsed response body).
pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        // Error responses from extractor rejections carry a plain-text body;
        // fall back to capturing it as a string rather than failing the parse.
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// GET a URI and return (status, parsed response body).
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Create a presentation through the API and return its id.
pub async fn create_presentation(router: &Router) -> Uuid {
    let (status, body) = post_json(
        router,
        "/api/v1/presentation",
        json!({"layout": default_layout()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Insert a slide through the API, asserting success.
pub async fn insert_slide(router: &Router, presentation_id: Uuid, index: u32) -> Value {
    let (status, body) = post_json(
        router,
        "/api/v1/slide/create",
        json!({
            "presentation_id": presentation_id,
            "slide_index": index,
            "content": format!("outline {index}"),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "insert failed: {body}");
    body
}
