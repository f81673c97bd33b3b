//! Router configuration for the deck API.
//!
//! This module defines the HTTP routes and applies middleware for CORS and
//! request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health                          - Health check
//! /api/v1/presentation             - Create presentation
//! /api/v1/presentation/{id}        - Presentation with ordered slides
//! /api/v1/slide/create             - Insert slide at index
//! /api/v1/slide/edit               - Replace slide content
//! /api/v1/slide/edit-html          - Replace slide HTML
//! /api/v1/slide/delete             - Delete slide at index
//! ```
//!
//! # Example
//!
//! ```ignore
//! use deck_composer::server::routes::{create_router, RouterConfig};
//!
//! let service = Arc::new(DeckService::new(store, generator, assets));
//! let router = create_router(service, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_presentation_handler, create_slide_handler, delete_slide_handler, edit_slide_handler,
    edit_slide_html_handler, get_presentation_handler, health_handler, AppState,
};
use crate::assets::ImageFetcher;
use crate::deck::DeckService;
use crate::generation::SlideGenerator;
use crate::store::DeckStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cors_origins: None, // Allow any origin by default
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `service` - The deck service handling slide operations
/// * `config` - Router configuration
///
/// # Returns
///
/// A configured Axum router ready to be served.
pub fn create_router<S, G, F>(service: Arc<DeckService<S, G, F>>, config: RouterConfig) -> Router
where
    S: DeckStore + 'static,
    G: SlideGenerator + 'static,
    F: ImageFetcher + 'static,
{
    let app_state = AppState::new(service);
    let cors = build_cors_layer(&config);

    let api_routes = Router::new()
        .route("/presentation", post(create_presentation_handler::<S, G, F>))
        .route(
            "/presentation/{id}",
            get(get_presentation_handler::<S, G, F>),
        )
        .route("/slide/create", post(create_slide_handler::<S, G, F>))
        .route("/slide/edit", post(edit_slide_handler::<S, G, F>))
        .route("/slide/edit-html", post(edit_slide_html_handler::<S, G, F>))
        .route("/slide/delete", post(delete_slide_handler::<S, G, F>))
        .with_state(app_state);

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_handler))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
