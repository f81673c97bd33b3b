//! Transactional store for presentations, slides, and asset records.
//!
//! The store is the only mutual-exclusion mechanism below the deck service:
//! every structural operation is expressed as one [`MutationBatch`] and
//! committed atomically. Reads are point lookups (by slide identity or by
//! ordinal within a presentation) plus a freshly materialized ordered
//! listing; there are no live cursors.
//!
//! The batch keeps its mutations in insertion order, and implementations
//! must apply them in that order. Reindex shifts rely on this: applied
//! one row at a time, a descending insert-shift (or ascending delete-shift)
//! never moves a slide onto an index another live slide still occupies.
//! That ordering is a contract of this module even for backends whose
//! commit is truly atomic.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{ImageAsset, Presentation, Slide};

/// A single mutation inside a batch.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Upsert a presentation record
    PutPresentation(Presentation),

    /// Upsert a slide row (full state)
    PutSlide(Slide),

    /// Hard-delete a slide row; removing an unknown identity is a no-op
    RemoveSlide(Uuid),

    /// Upsert an asset record
    PutAsset(ImageAsset),
}

/// An ordered list of mutations committed as one unit.
#[derive(Debug, Default)]
pub struct MutationBatch {
    mutations: Vec<Mutation>,
}

impl MutationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_presentation(mut self, presentation: Presentation) -> Self {
        self.mutations.push(Mutation::PutPresentation(presentation));
        self
    }

    pub fn put_slide(mut self, slide: Slide) -> Self {
        self.mutations.push(Mutation::PutSlide(slide));
        self
    }

    /// Append slide upserts preserving the iterator's order.
    ///
    /// Callers encode the reindex application direction by the order of
    /// this iterator.
    pub fn put_slides(mut self, slides: impl IntoIterator<Item = Slide>) -> Self {
        self.mutations.extend(slides.into_iter().map(Mutation::PutSlide));
        self
    }

    pub fn remove_slide(mut self, id: Uuid) -> Self {
        self.mutations.push(Mutation::RemoveSlide(id));
        self
    }

    pub fn put_assets(mut self, assets: impl IntoIterator<Item = ImageAsset>) -> Self {
        self.mutations.extend(assets.into_iter().map(Mutation::PutAsset));
        self
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// The mutations in application order.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn into_mutations(self) -> Vec<Mutation> {
        self.mutations
    }
}

/// Store contract consumed by the deck service.
///
/// All operations are transactional against the backing engine; no partial
/// application is observable. Failures propagate without retries — the
/// caller abandons the enclosing operation.
#[async_trait]
pub trait DeckStore: Send + Sync {
    /// Point lookup of a presentation.
    async fn presentation(&self, id: Uuid) -> Result<Option<Presentation>, StoreError>;

    /// Point lookup of a slide by identity.
    async fn slide(&self, id: Uuid) -> Result<Option<Slide>, StoreError>;

    /// Lookup of a slide by its ordinal within a presentation.
    async fn slide_at(&self, presentation: Uuid, index: u32)
        -> Result<Option<Slide>, StoreError>;

    /// All live slides of a presentation, ascending by index, freshly
    /// materialized.
    async fn slides_ordered(&self, presentation: Uuid) -> Result<Vec<Slide>, StoreError>;

    /// Apply a batch atomically, in order.
    async fn commit(&self, batch: MutationBatch) -> Result<(), StoreError>;

    /// Upsert one slide.
    async fn put_slide(&self, slide: Slide) -> Result<(), StoreError> {
        self.commit(MutationBatch::new().put_slide(slide)).await
    }

    /// Upsert one presentation.
    async fn put_presentation(&self, presentation: Presentation) -> Result<(), StoreError> {
        self.commit(MutationBatch::new().put_presentation(presentation))
            .await
    }

    /// Remove one slide by identity.
    async fn remove_slide(&self, id: Uuid) -> Result<(), StoreError> {
        self.commit(MutationBatch::new().remove_slide(id)).await
    }
}
