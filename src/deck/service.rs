//! Deck service: structural operations over a presentation's slides.
//!
//! Three mutating operations — insert-at-index, delete-at-index, and
//! content replace (structured or HTML) — plus the reads the HTTP layer
//! serves. Each operation is atomic: collaborators run first, then every
//! row touched by the operation goes into a single store commit. A failure
//! anywhere aborts with prior state untouched.
//!
//! # Reindex shifts
//!
//! Insert rewrites the tail `[index, count)` to `index + 1` in descending
//! index order; delete rewrites `(index, count)` to `index - 1` ascending.
//! Both directions guarantee that, applied one row at a time, no two live
//! slides ever momentarily share an index. This ordering is a contract of
//! the shift builders, kept even though the bundled store commits
//! atomically, so that stores applying batches non-atomically stay safe.
//!
//! # Serialization
//!
//! The read-validate-write shape is not atomic against concurrent
//! structural changes, so the service serializes mutations per
//! presentation with a keyed lock taken before validation. Operations on
//! different presentations proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::assets::{AssetCoordinator, ImageFetcher};
use crate::error::{DeckError, GenerationError};
use crate::generation::SlideGenerator;
use crate::model::{
    DeckLayout, DeckOutline, DeckWithSlides, GenerationOptions, Presentation, Slide,
};
use crate::store::{DeckStore, MutationBatch};

use super::counters;

/// Request body for creating an empty presentation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePresentationRequest {
    pub layout: DeckLayout,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

/// Orchestrator for the ordered slide collection of each presentation.
pub struct DeckService<S, G, F>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    store: Arc<S>,
    generator: Arc<G>,
    assets: AssetCoordinator<F>,

    /// Per-presentation mutation guards
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<S, G, F> DeckService<S, G, F>
where
    S: DeckStore,
    G: SlideGenerator,
    F: ImageFetcher,
{
    pub fn new(store: Arc<S>, generator: Arc<G>, assets: AssetCoordinator<F>) -> Self {
        Self {
            store,
            generator,
            assets,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The store this service operates on.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Acquire the mutation guard for one presentation.
    async fn guard(&self, presentation: Uuid) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(presentation)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Presentation metadata with its ordered slide collection.
    pub async fn deck(&self, presentation_id: Uuid) -> Result<DeckWithSlides, DeckError> {
        let presentation = self
            .store
            .presentation(presentation_id)
            .await?
            .ok_or(DeckError::PresentationNotFound {
                id: presentation_id,
            })?;
        let slides = self.store.slides_ordered(presentation_id).await?;
        Ok(DeckWithSlides {
            presentation,
            slides,
        })
    }

    // =========================================================================
    // Presentation lifecycle
    // =========================================================================

    /// Create an empty presentation over a layout group.
    pub async fn create_presentation(
        &self,
        request: CreatePresentationRequest,
    ) -> Result<Presentation, DeckError> {
        let presentation = Presentation::new(request.layout, request.options);
        self.store.put_presentation(presentation.clone()).await?;
        Ok(presentation)
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert a freshly generated slide at `index`.
    ///
    /// Valid indices are `0..=count`; the tail of the collection shifts up
    /// by one. The response carries the updated presentation and ordered
    /// slides.
    pub async fn insert_slide(
        &self,
        presentation_id: Uuid,
        index: u32,
        outline_text: String,
    ) -> Result<DeckWithSlides, DeckError> {
        let _guard = self.guard(presentation_id).await;

        let presentation = self
            .store
            .presentation(presentation_id)
            .await?
            .ok_or(DeckError::PresentationNotFound {
                id: presentation_id,
            })?;

        let slides = self.store.slides_ordered(presentation_id).await?;
        let count = slides.len() as u32;
        if index > count {
            return Err(DeckError::IndexOutOfRange { index, count });
        }

        let outline = DeckOutline::single(outline_text);

        // Resolve the layout slot: ordered layouts are a fixed sequence,
        // anything else asks the structure collaborator.
        let structure = if presentation.layout.ordered {
            presentation.layout.structure()
        } else {
            self.generator
                .generate_structure(
                    &outline,
                    &presentation.layout,
                    presentation.instructions.as_deref(),
                    true,
                )
                .await?
        };
        let slot_index = match structure.first() {
            Some(&suggested) => presentation.layout.clamp_slot_index(suggested),
            None => {
                return Err(GenerationError::EmptyResult {
                    what: "deck structure",
                }
                .into())
            }
        };
        let slot = presentation
            .layout
            .slot(slot_index)
            .ok_or_else(|| DeckError::Consistency {
                message: format!(
                    "layout {} has no slot for index {slot_index}",
                    presentation.layout.name
                ),
            })?
            .clone();

        let content = self
            .generator
            .generate_content(&slot, &outline.slides[0], &presentation.generation_options())
            .await?;

        let mut slide = Slide::new(
            presentation_id,
            index,
            &slot.id,
            Some(presentation.layout.name.clone()),
            content,
        );

        let shifted = shift_up(&slides, index);

        // Create case: no prior content to diff against.
        let mut content = std::mem::take(&mut slide.content);
        let new_assets = self
            .assets
            .reconcile(presentation_id, None, &mut content)
            .await?;
        slide.content = content;

        let batch = MutationBatch::new()
            .put_slides(shifted)
            .put_slide(slide)
            .put_assets(new_assets)
            .put_presentation(counters::incremented(presentation));
        self.store.commit(batch).await?;

        self.deck(presentation_id).await
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Delete the slide at `index`, closing the gap it leaves.
    pub async fn delete_slide(
        &self,
        presentation_id: Uuid,
        index: u32,
    ) -> Result<DeckWithSlides, DeckError> {
        let _guard = self.guard(presentation_id).await;

        let presentation = self
            .store
            .presentation(presentation_id)
            .await?
            .ok_or(DeckError::PresentationNotFound {
                id: presentation_id,
            })?;

        let slides = self.store.slides_ordered(presentation_id).await?;
        let count = slides.len() as u32;
        if index >= count {
            return Err(DeckError::IndexOutOfRange { index, count });
        }

        // The count check just passed, so a missing row here means the
        // collection is already inconsistent.
        let target = self
            .store
            .slide_at(presentation_id, index)
            .await?
            .ok_or_else(|| DeckError::Consistency {
                message: format!(
                    "presentation {presentation_id} counts {count} slides but none lives at index {index}"
                ),
            })?;

        let shifted = shift_down(&slides, index);

        let batch = MutationBatch::new()
            .remove_slide(target.id)
            .put_slides(shifted)
            .put_presentation(counters::decremented(presentation));
        self.store.commit(batch).await?;

        self.deck(presentation_id).await
    }

    // =========================================================================
    // Replace-in-place
    // =========================================================================

    /// Regenerate the content of the slide at `index` from `prompt`.
    ///
    /// The slide keeps its position but gets a new identity; that identity
    /// change is the update signal for polling consumers.
    pub async fn edit_slide(
        &self,
        presentation_id: Uuid,
        index: u32,
        prompt: &str,
    ) -> Result<Slide, DeckError> {
        let _guard = self.guard(presentation_id).await;

        let presentation = self
            .store
            .presentation(presentation_id)
            .await?
            .ok_or(DeckError::PresentationNotFound {
                id: presentation_id,
            })?;

        let mut slide = self
            .store
            .slide_at(presentation_id, index)
            .await?
            .ok_or_else(|| DeckError::slide_not_found_at(presentation_id, index))?;

        let layout = self
            .generator
            .select_layout(prompt, &presentation.layout, &slide)
            .await?;

        let mut new_content = self
            .generator
            .edit_content(prompt, &slide, presentation.language.as_deref(), &layout)
            .await?;

        let new_assets = self
            .assets
            .reconcile(presentation_id, Some(&slide.content), &mut new_content)
            .await?;

        let old_id = slide.id;
        slide.replace_content(new_content, layout.id);

        let batch = MutationBatch::new()
            .remove_slide(old_id)
            .put_slide(slide.clone())
            .put_assets(new_assets);
        self.store.commit(batch).await?;

        Ok(slide)
    }

    /// Rewrite a slide's HTML surface from `prompt`.
    ///
    /// Identity is reassigned exactly as for a structured edit, but asset
    /// reconciliation does not run: HTML edits touch only markup.
    pub async fn edit_slide_html(
        &self,
        slide_id: Uuid,
        prompt: &str,
        html: Option<String>,
    ) -> Result<Slide, DeckError> {
        let presentation_id = self
            .store
            .slide(slide_id)
            .await?
            .ok_or_else(|| DeckError::slide_not_found(slide_id))?
            .presentation;

        let _guard = self.guard(presentation_id).await;

        // Re-resolve under the guard; the slide may have been replaced.
        let mut slide = self
            .store
            .slide(slide_id)
            .await?
            .ok_or_else(|| DeckError::slide_not_found(slide_id))?;

        let html_to_edit = html
            .or_else(|| slide.html_content.clone())
            .ok_or(DeckError::NoEditableHtml { id: slide_id })?;

        let edited = self.generator.edit_html(prompt, &html_to_edit).await?;

        let old_id = slide.id;
        slide.replace_html(edited);

        let batch = MutationBatch::new()
            .remove_slide(old_id)
            .put_slide(slide.clone());
        self.store.commit(batch).await?;

        Ok(slide)
    }
}

// =============================================================================
// Reindex shift builders
// =============================================================================

/// Slides at `from` or later rewritten to `index + 1`, **descending** by
/// index.
///
/// The order is part of the contract: applied one row at a time, the
/// highest index moves into vacant space first, so no intermediate state
/// holds two slides on one index.
fn shift_up(slides: &[Slide], from: u32) -> Vec<Slide> {
    let mut tail: Vec<Slide> = slides.iter().filter(|s| s.index >= from).cloned().collect();
    tail.sort_by(|a, b| b.index.cmp(&a.index));
    tail.into_iter()
        .map(|slide| {
            let index = slide.index + 1;
            slide.at_index(index)
        })
        .collect()
}

/// Slides after `after` rewritten to `index - 1`, **ascending** by index.
///
/// Mirror of [`shift_up`]: ascending application moves each row into the
/// gap its predecessor just vacated.
fn shift_down(slides: &[Slide], after: u32) -> Vec<Slide> {
    let mut tail: Vec<Slide> = slides.iter().filter(|s| s.index > after).cloned().collect();
    tail.sort_by_key(|s| s.index);
    tail.into_iter()
        .map(|slide| {
            let index = slide.index - 1;
            slide.at_index(index)
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
