use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the slide store.
///
/// The store performs no retries; a failed commit leaves the previous state
/// untouched and the error propagates to the caller.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Error from the backing storage engine
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A batch mutation would leave two live slides of one presentation on
    /// the same index. Raised while applying the batch in order, so a
    /// reindex shift applied in the wrong direction fails loudly.
    #[error("index conflict: presentation {presentation} already has a live slide at index {index}")]
    IndexConflict { presentation: Uuid, index: u32 },
}

/// Errors from the generation collaborators (content, layout, structure,
/// image fetch).
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The collaborator call itself failed (network, non-2xx, timeout)
    #[error("generation upstream failed: {0}")]
    Upstream(String),

    /// The collaborator answered but the payload could not be decoded
    #[error("invalid generation response: {0}")]
    InvalidResponse(String),

    /// The collaborator returned an empty or unusable result
    #[error("generation returned an empty result: {what}")]
    EmptyResult { what: &'static str },
}

/// Errors produced by deck operations.
///
/// Every variant aborts the enclosing operation before anything is
/// committed; there is no partial-commit path.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Presentation identity does not resolve (should map to HTTP 404)
    #[error("presentation not found: {id}")]
    PresentationNotFound { id: Uuid },

    /// Slide identity or ordinal does not resolve (should map to HTTP 404)
    #[error("slide not found: {slide}")]
    SlideNotFound { slide: String },

    /// Requested index outside `[0, count]` for insert or `[0, count)` for
    /// delete/lookup
    #[error("slide index out of range: {index} (presentation has {count} slides)")]
    IndexOutOfRange { index: u32, count: u32 },

    /// HTML edit requested for a slide with no HTML surface
    #[error("slide {id} has no HTML content to edit")]
    NoEditableHtml { id: Uuid },

    /// A generation collaborator failed; nothing was persisted
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// An internal invariant check failed; treated as a defect signal
    #[error("consistency violation: {message}")]
    Consistency { message: String },

    /// Store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DeckError {
    /// Build the `SlideNotFound` variant for an ordinal lookup.
    pub fn slide_not_found_at(presentation: Uuid, index: u32) -> Self {
        DeckError::SlideNotFound {
            slide: format!("{presentation}[{index}]"),
        }
    }

    /// Build the `SlideNotFound` variant for an identity lookup.
    pub fn slide_not_found(id: Uuid) -> Self {
        DeckError::SlideNotFound {
            slide: id.to_string(),
        }
    }
}
