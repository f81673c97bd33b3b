//! HTTP server layer for the deck API.
//!
//! This module provides the HTTP surface over the deck service: request
//! bodies, response shapes, error mapping, and router construction. The
//! handlers hold no logic of their own; every slide operation goes through
//! [`crate::deck::DeckService`].

pub mod handlers;
pub mod routes;

pub use handlers::{
    create_presentation_handler, create_slide_handler, delete_slide_handler, edit_slide_handler,
    edit_slide_html_handler, get_presentation_handler, health_handler, AppState,
    CreateSlideRequest, DeleteSlideRequest, EditSlideHtmlRequest, EditSlideRequest, ErrorResponse,
    HealthResponse,
};
pub use routes::{create_router, RouterConfig};
