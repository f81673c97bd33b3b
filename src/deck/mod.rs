//! Ordered-slide-collection management.
//!
//! [`DeckService`] is the orchestrator behind every structural slide
//! operation: it validates indices against the live collection, drives the
//! generation collaborators, computes the reindex shift that keeps slide
//! ordinals contiguous, and commits the whole mutation as one unit.

pub mod counters;
mod service;

pub use service::{CreatePresentationRequest, DeckService};
