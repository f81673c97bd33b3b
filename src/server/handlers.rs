//! HTTP request handlers for the deck API.
//!
//! This module contains the Axum handlers for slide operations and health
//! checks. The handlers are thin: request bodies deserialize into plain
//! structs, everything interesting happens in the deck service, and
//! [`DeckError`] maps onto HTTP responses here.
//!
//! # Endpoints
//!
//! - `POST /api/v1/presentation` - Create an empty presentation
//! - `GET /api/v1/presentation/{id}` - Presentation with ordered slides
//! - `POST /api/v1/slide/create` - Insert a generated slide at an index
//! - `POST /api/v1/slide/edit` - Replace a slide's content
//! - `POST /api/v1/slide/edit-html` - Replace a slide's HTML surface
//! - `POST /api/v1/slide/delete` - Delete the slide at an index
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::assets::ImageFetcher;
use crate::deck::{CreatePresentationRequest, DeckService};
use crate::error::DeckError;
use crate::generation::SlideGenerator;
use crate::model::{DeckWithSlides, Presentation, Slide};
use crate::store::DeckStore;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state handed to every handler.
pub struct AppState<S, G, F>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    /// The deck service processing all slide operations
    pub service: Arc<DeckService<S, G, F>>,
}

impl<S, G, F> AppState<S, G, F>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    pub fn new(service: Arc<DeckService<S, G, F>>) -> Self {
        Self { service }
    }
}

impl<S, G, F> Clone for AppState<S, G, F>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body for `POST /api/v1/slide/create`.
#[derive(Debug, Deserialize)]
pub struct CreateSlideRequest {
    pub presentation_id: Uuid,

    /// Target position, `0..=count`
    pub slide_index: u32,

    /// Outline text the slide is generated from
    pub content: String,
}

/// Body for `POST /api/v1/slide/edit`.
#[derive(Debug, Deserialize)]
pub struct EditSlideRequest {
    pub presentation_id: Uuid,
    pub slide_index: u32,
    pub prompt: String,
}

/// Body for `POST /api/v1/slide/edit-html`.
#[derive(Debug, Deserialize)]
pub struct EditSlideHtmlRequest {
    /// Slide identity (HTML edits address slides directly)
    pub id: Uuid,
    pub prompt: String,

    /// HTML to edit; falls back to the slide's stored markup
    #[serde(default)]
    pub html: Option<String>,
}

/// Body for `POST /api/v1/slide/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteSlideRequest {
    pub presentation_id: Uuid,
    pub slide_index: u32,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "index_out_of_range")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert DeckError to an HTTP response.
///
/// This implementation logs errors based on their severity:
/// - 5xx errors are logged at ERROR level
/// - 404s are logged at DEBUG level (common and expected)
/// - other 4xx errors are logged at WARN level
impl IntoResponse for DeckError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            DeckError::PresentationNotFound { id } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Presentation not found: {id}"),
            ),

            DeckError::SlideNotFound { slide } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Slide not found: {slide}"),
            ),

            DeckError::IndexOutOfRange { index, count } => (
                StatusCode::BAD_REQUEST,
                "index_out_of_range",
                format!("Slide index {index} is out of range for {count} slides"),
            ),

            DeckError::NoEditableHtml { id } => (
                StatusCode::BAD_REQUEST,
                "no_editable_html",
                format!("Slide {id} has no HTML to edit"),
            ),

            DeckError::Generation(e) => (
                StatusCode::BAD_GATEWAY,
                "generation_failed",
                format!("Generation failed: {e}"),
            ),

            DeckError::Consistency { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "consistency_violation",
                format!("Consistency violation: {message}"),
            ),

            DeckError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                format!("Store error: {e}"),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an empty presentation over a layout group.
///
/// # Endpoint
///
/// `POST /api/v1/presentation`
///
/// # Response
///
/// `200 OK` with the created presentation (`n_slides` starts at 0).
pub async fn create_presentation_handler<S, G, F>(
    State(state): State<AppState<S, G, F>>,
    Json(body): Json<CreatePresentationRequest>,
) -> Result<Json<Presentation>, DeckError>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    let presentation = state.service.create_presentation(body).await?;
    Ok(Json(presentation))
}

/// Fetch a presentation together with its ordered slides.
///
/// # Endpoint
///
/// `GET /api/v1/presentation/{id}`
///
/// # Errors
///
/// - `404 Not Found`: unknown presentation
pub async fn get_presentation_handler<S, G, F>(
    State(state): State<AppState<S, G, F>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeckWithSlides>, DeckError>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    let deck = state.service.deck(id).await?;
    Ok(Json(deck))
}

/// Insert a generated slide at the requested index.
///
/// # Endpoint
///
/// `POST /api/v1/slide/create`
///
/// # Response
///
/// `200 OK` with the updated presentation and ordered slide collection.
///
/// # Errors
///
/// - `400 Bad Request`: index outside `0..=count`
/// - `404 Not Found`: unknown presentation
/// - `502 Bad Gateway`: a generation collaborator failed
pub async fn create_slide_handler<S, G, F>(
    State(state): State<AppState<S, G, F>>,
    Json(body): Json<CreateSlideRequest>,
) -> Result<Json<DeckWithSlides>, DeckError>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    let deck = state
        .service
        .insert_slide(body.presentation_id, body.slide_index, body.content)
        .await?;
    Ok(Json(deck))
}

/// Replace the content of the slide at the requested index.
///
/// # Endpoint
///
/// `POST /api/v1/slide/edit`
///
/// # Response
///
/// `200 OK` with the updated slide. The slide's `id` changes on every
/// successful edit; clients track updates through it.
pub async fn edit_slide_handler<S, G, F>(
    State(state): State<AppState<S, G, F>>,
    Json(body): Json<EditSlideRequest>,
) -> Result<Json<Slide>, DeckError>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    let slide = state
        .service
        .edit_slide(body.presentation_id, body.slide_index, &body.prompt)
        .await?;
    Ok(Json(slide))
}

/// Replace a slide's HTML surface.
///
/// # Endpoint
///
/// `POST /api/v1/slide/edit-html`
///
/// # Errors
///
/// - `400 Bad Request`: neither the request nor the slide carries HTML
/// - `404 Not Found`: unknown slide
pub async fn edit_slide_html_handler<S, G, F>(
    State(state): State<AppState<S, G, F>>,
    Json(body): Json<EditSlideHtmlRequest>,
) -> Result<Json<Slide>, DeckError>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    let slide = state
        .service
        .edit_slide_html(body.id, &body.prompt, body.html)
        .await?;
    Ok(Json(slide))
}

/// Delete the slide at the requested index.
///
/// # Endpoint
///
/// `POST /api/v1/slide/delete`
///
/// # Response
///
/// `200 OK` with the updated presentation and ordered slide collection.
///
/// # Errors
///
/// - `400 Bad Request`: index outside `0..count`
/// - `404 Not Found`: unknown presentation
pub async fn delete_slide_handler<S, G, F>(
    State(state): State<AppState<S, G, F>>,
    Json(body): Json<DeleteSlideRequest>,
) -> Result<Json<DeckWithSlides>, DeckError>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    let deck = state
        .service
        .delete_slide(body.presentation_id, body.slide_index)
        .await?;
    Ok(Json(deck))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
