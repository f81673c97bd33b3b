//! In-memory transactional store.
//!
//! The provided [`DeckStore`] implementation: all records live in one
//! `RwLock`-guarded state. A commit clones the state, applies the batch to
//! the clone in order, and swaps it in on success, so a failing batch is
//! never partially visible.
//!
//! While applying, each slide upsert is checked against the live set: two
//! slides of one presentation must never share an index, not even between
//! two mutations of the same batch. This makes the reindex application
//! direction observable — a shift built in the wrong order is rejected with
//! [`StoreError::IndexConflict`] instead of silently relying on the final
//! state being consistent.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{ImageAsset, Presentation, Slide};

use super::{DeckStore, Mutation, MutationBatch};

#[derive(Debug, Clone, Default)]
struct State {
    presentations: HashMap<Uuid, Presentation>,
    slides: HashMap<Uuid, Slide>,
    assets: HashMap<Uuid, ImageAsset>,
}

impl State {
    fn apply(&mut self, mutation: Mutation) -> Result<(), StoreError> {
        match mutation {
            Mutation::PutPresentation(presentation) => {
                self.presentations.insert(presentation.id, presentation);
            }
            Mutation::PutSlide(slide) => {
                let occupied = self.slides.values().any(|s| {
                    s.id != slide.id
                        && s.presentation == slide.presentation
                        && s.index == slide.index
                });
                if occupied {
                    return Err(StoreError::IndexConflict {
                        presentation: slide.presentation,
                        index: slide.index,
                    });
                }
                self.slides.insert(slide.id, slide);
            }
            Mutation::RemoveSlide(id) => {
                self.slides.remove(&id);
            }
            Mutation::PutAsset(asset) => {
                self.assets.insert(asset.id, asset);
            }
        }
        Ok(())
    }
}

/// In-memory store with atomic batch commits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored asset records.
    pub async fn asset_count(&self) -> usize {
        self.state.read().await.assets.len()
    }

    /// Point lookup of an asset record.
    pub async fn asset(&self, id: Uuid) -> Option<ImageAsset> {
        self.state.read().await.assets.get(&id).cloned()
    }
}

#[async_trait]
impl DeckStore for MemoryStore {
    async fn presentation(&self, id: Uuid) -> Result<Option<Presentation>, StoreError> {
        Ok(self.state.read().await.presentations.get(&id).cloned())
    }

    async fn slide(&self, id: Uuid) -> Result<Option<Slide>, StoreError> {
        Ok(self.state.read().await.slides.get(&id).cloned())
    }

    async fn slide_at(
        &self,
        presentation: Uuid,
        index: u32,
    ) -> Result<Option<Slide>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .slides
            .values()
            .find(|s| s.presentation == presentation && s.index == index)
            .cloned())
    }

    async fn slides_ordered(&self, presentation: Uuid) -> Result<Vec<Slide>, StoreError> {
        let state = self.state.read().await;
        let mut slides: Vec<Slide> = state
            .slides
            .values()
            .filter(|s| s.presentation == presentation)
            .cloned()
            .collect();
        slides.sort_by_key(|s| s.index);
        Ok(slides)
    }

    async fn commit(&self, batch: MutationBatch) -> Result<(), StoreError> {
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        for mutation in batch.into_mutations() {
            next.apply(mutation)?;
        }
        *guard = next;
        Ok(())
    }
}
