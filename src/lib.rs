//! # deck-composer
//!
//! A web backend for AI-assisted generation and editing of presentation
//! slide decks.
//!
//! Presentations own ordered collections of slides. Structural operations
//! (insert, edit, delete) keep slide indices contiguous and keep the
//! relational record consistent with externally generated visual assets:
//! every operation either fully commits or leaves prior state untouched.
//!
//! ## Features
//!
//! - **Ordered slide collections**: contiguous 0-based indices maintained
//!   through batch reindex shifts with a documented application direction
//! - **Atomic operations**: generation runs first, then every touched row
//!   goes into a single store commit
//! - **Asset reconciliation**: image references in slide content are
//!   diffed, fetched, and rewritten in the same commit as the slide
//! - **Collaborator seams**: content generation and image fetch behind
//!   async traits, with HTTP-backed implementations for deployment
//! - **Optional object storage**: generated assets are mirrored to an
//!   S3-compatible bucket when configured
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`model`] - Presentations, slides, content documents, asset records
//! - [`store`] - Transactional store contract and the in-memory engine
//! - [`deck`] - The deck service: insert/edit/delete orchestration
//! - [`assets`] - Asset reconciliation and image fetch
//! - [`generation`] - Content-generation collaborator interface
//! - [`storage`] - Object storage for generated files
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types

pub mod assets;
pub mod config;
pub mod deck;
pub mod error;
pub mod generation;
pub mod model;
pub mod server;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use assets::{AssetCoordinator, HttpImageFetcher, ImageFetcher};
pub use config::Config;
pub use deck::{counters, CreatePresentationRequest, DeckService};
pub use error::{DeckError, GenerationError, StoreError};
pub use generation::{HttpGenerator, SlideGenerator};
pub use model::{
    DeckLayout, DeckOutline, DeckWithSlides, GenerationOptions, ImageAsset, ImagePrompt,
    Presentation, Slide, SlideContent, SlideLayout, SlideOutline, IMAGE_PROMPT_KEY, IMAGE_URL_KEY,
    SPEAKER_NOTE_KEY,
};
pub use server::{create_router, AppState, ErrorResponse, HealthResponse, RouterConfig};
pub use storage::{ObjectStorage, StorageConfig};
pub use store::{DeckStore, MemoryStore, Mutation, MutationBatch};
