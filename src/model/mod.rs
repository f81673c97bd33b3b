//! Domain model for presentations, slides, and generated assets.
//!
//! A presentation owns an ordered collection of slides. Slide ordering is
//! expressed through a 0-based `index` that stays contiguous across inserts
//! and deletes; the deck service (`crate::deck`) is responsible for keeping
//! it that way. Slide bodies are structured JSON documents produced by the
//! generation collaborators, with a small set of reserved keys interpreted
//! by this backend rather than by content consumers.

mod asset;
mod presentation;
mod slide;

pub use asset::{ImageAsset, ImagePrompt};
pub use presentation::{
    DeckLayout, DeckOutline, DeckWithSlides, GenerationOptions, Presentation, SlideLayout,
    SlideOutline,
};
pub use slide::{Slide, SlideContent};

/// Reserved content key mirrored into [`Slide::speaker_note`].
///
/// The key stays inside the stored document but is not part of the surface
/// content consumers render; readers should go through the mirrored column.
pub const SPEAKER_NOTE_KEY: &str = "__speaker_note__";

/// Reserved key marking a JSON object as an image node to be resolved by
/// asset reconciliation.
pub const IMAGE_PROMPT_KEY: &str = "__image_prompt__";

/// Reserved key holding the resolved asset location inside an image node.
pub const IMAGE_URL_KEY: &str = "__image_url__";
