//! Content-generation collaborators.
//!
//! Everything the backend cannot compute itself — slide content, layout
//! selection, deck structure, HTML rewriting — is reached through the
//! [`SlideGenerator`] trait. The deck service treats each call as an opaque
//! `generate(input) -> content` function; the prompting strategy lives on
//! the other side of the wire and is out of scope here.
//!
//! [`HttpGenerator`] is the JSON-over-HTTP implementation used by the
//! binary; tests substitute in-process mocks.

mod http;

pub use http::HttpGenerator;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::model::{
    DeckLayout, DeckOutline, GenerationOptions, Slide, SlideContent, SlideLayout, SlideOutline,
};

/// Interface to the external generation service.
///
/// Implementations must not persist anything: the deck service owns
/// persistence and commits generated results together with the slide
/// mutation they belong to. A failed or empty result surfaces as
/// [`GenerationError`] and aborts the whole operation.
#[async_trait]
pub trait SlideGenerator: Send + Sync {
    /// Generate structured content for one slide of the given layout slot.
    async fn generate_content(
        &self,
        layout: &SlideLayout,
        outline: &SlideOutline,
        options: &GenerationOptions,
    ) -> Result<SlideContent, GenerationError>;

    /// Rewrite an existing slide's content according to `prompt`.
    async fn edit_content(
        &self,
        prompt: &str,
        slide: &Slide,
        language: Option<&str>,
        layout: &SlideLayout,
    ) -> Result<SlideContent, GenerationError>;

    /// Rewrite a slide's raw HTML according to `prompt`.
    async fn edit_html(&self, prompt: &str, html: &str) -> Result<String, GenerationError>;

    /// Pick the layout slot an edited slide should use.
    async fn select_layout(
        &self,
        prompt: &str,
        layout: &DeckLayout,
        slide: &Slide,
    ) -> Result<SlideLayout, GenerationError>;

    /// Map outline entries to layout slot indices.
    ///
    /// With `single_slide` set the caller will only consume the first
    /// entry. Suggested indices may be out of bounds; callers clamp.
    async fn generate_structure(
        &self,
        outline: &DeckOutline,
        layout: &DeckLayout,
        instructions: Option<&str>,
        single_slide: bool,
    ) -> Result<Vec<usize>, GenerationError>;
}
