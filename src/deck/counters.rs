//! Denormalized slide-count maintenance.
//!
//! `Presentation::n_slides` exists for O(1) count reads without scanning
//! slide rows. It is a cache: the ordered listing stays authoritative, the
//! deck service updates the counter in the same commit as the rows it
//! describes, and [`verify`] re-derives the truth to catch drift.

use crate::error::DeckError;
use crate::model::{Presentation, Slide};

/// The presentation with its counter bumped for one inserted slide.
pub fn incremented(mut presentation: Presentation) -> Presentation {
    presentation.n_slides += 1;
    presentation.updated_at = chrono::Utc::now();
    presentation
}

/// The presentation with its counter dropped for one deleted slide,
/// floored at zero.
pub fn decremented(mut presentation: Presentation) -> Presentation {
    presentation.n_slides = presentation.n_slides.saturating_sub(1);
    presentation.updated_at = chrono::Utc::now();
    presentation
}

/// Check the counter and the index contiguity against an ordered listing.
///
/// `slides` must be sorted ascending by index (the shape
/// `DeckStore::slides_ordered` returns).
pub fn verify(presentation: &Presentation, slides: &[Slide]) -> Result<(), DeckError> {
    if presentation.n_slides as usize != slides.len() {
        return Err(DeckError::Consistency {
            message: format!(
                "presentation {} counts {} slides but {} are live",
                presentation.id,
                presentation.n_slides,
                slides.len()
            ),
        });
    }
    for (expected, slide) in slides.iter().enumerate() {
        if slide.index as usize != expected {
            return Err(DeckError::Consistency {
                message: format!(
                    "presentation {} has slide {} at index {} where {} was expected",
                    presentation.id, slide.id, slide.index, expected
                ),
            });
        }
    }
    Ok(())
}
