//! Presentation records, layout references, and outline inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Slide;

/// One layout slot a slide's content can be generated to fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideLayout {
    /// Slot identifier, stored on slides that use it
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SlideLayout {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
        }
    }
}

/// A presentation's layout/template reference: a named group of slide
/// layout slots.
///
/// When `ordered` is set the group is a fixed sequence and structure
/// selection does not involve the generation collaborator at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckLayout {
    pub name: String,
    #[serde(default)]
    pub ordered: bool,
    pub slides: Vec<SlideLayout>,
}

impl DeckLayout {
    /// Layout slot at `index`, if in bounds.
    pub fn slot(&self, index: usize) -> Option<&SlideLayout> {
        self.slides.get(index)
    }

    /// The fixed structure of an ordered layout: one slot index per
    /// position.
    pub fn structure(&self) -> Vec<usize> {
        (0..self.slides.len()).collect()
    }

    /// Clamp a collaborator-suggested slot index into bounds, falling back
    /// to the first slot.
    pub fn clamp_slot_index(&self, suggested: usize) -> usize {
        if suggested < self.slides.len() {
            suggested
        } else {
            0
        }
    }
}

/// Outline entry for a single slide to be generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideOutline {
    pub content: String,
}

/// Outline for a whole deck (or a single slide wrapped as a one-entry deck).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOutline {
    pub slides: Vec<SlideOutline>,
}

impl DeckOutline {
    /// Wrap one outline entry, as used by insert-at-index.
    pub fn single(content: impl Into<String>) -> Self {
        Self {
            slides: vec![SlideOutline {
                content: content.into(),
            }],
        }
    }
}

/// Presentation-level knobs forwarded to content generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub language: Option<String>,
    pub tone: Option<String>,
    pub verbosity: Option<String>,
    pub instructions: Option<String>,
}

/// A presentation record.
///
/// `n_slides` is a denormalized count kept alongside the slide rows for
/// O(1) reads; the ordered slide listing stays the source of truth and the
/// deck service updates the counter in the same commit as the rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    pub id: Uuid,

    /// Denormalized live-slide count
    pub n_slides: u32,

    /// Layout/template reference the slides are generated against
    pub layout: DeckLayout,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Presentation {
    /// Create an empty presentation over the given layout.
    pub fn new(layout: DeckLayout, options: GenerationOptions) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            n_slides: 0,
            layout,
            language: options.language,
            tone: options.tone,
            verbosity: options.verbosity,
            instructions: options.instructions,
            created_at: now,
            updated_at: now,
        }
    }

    /// The generation knobs carried by this presentation.
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            language: self.language.clone(),
            tone: self.tone.clone(),
            verbosity: self.verbosity.clone(),
            instructions: self.instructions.clone(),
        }
    }
}

/// Presentation metadata together with its ordered slide collection, the
/// response shape for structural operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckWithSlides {
    #[serde(flatten)]
    pub presentation: Presentation,
    pub slides: Vec<Slide>,
}
