//! Asset reconciliation for slide content.
//!
//! Slide content documents reference images as JSON objects carrying a
//! `__image_prompt__` entry. The [`AssetCoordinator`] walks old and new
//! content, decides which references need (re)generation, fetches them
//! through an [`ImageFetcher`], and rewrites each node's `__image_url__`
//! to the resolved location. Newly created [`ImageAsset`] records are
//! returned to the caller, which persists them in the same commit as the
//! slide mutation — the coordinator itself never persists anything.
//!
//! When object storage is configured, fetched files are offered to it and
//! the asset records the object key; an unconfigured or failing upload
//! leaves the asset local, never failing the operation.

mod http;

pub use http::HttpImageFetcher;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::model::{ImageAsset, ImagePrompt, SlideContent, IMAGE_PROMPT_KEY, IMAGE_URL_KEY};
use crate::storage::ObjectStorage;

/// Interface to the external image generation/fetch service.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Generate or fetch one image, returning its asset record.
    async fn fetch(&self, prompt: &ImagePrompt) -> Result<ImageAsset, GenerationError>;
}

/// Decides which visual assets a content change requires and fetches them.
pub struct AssetCoordinator<F: ImageFetcher> {
    fetcher: Arc<F>,
    storage: Option<Arc<ObjectStorage>>,
}

impl<F: ImageFetcher> AssetCoordinator<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            storage: None,
        }
    }

    /// Attach object storage for uploading fetched files.
    pub fn with_storage(mut self, storage: Option<Arc<ObjectStorage>>) -> Self {
        self.storage = storage;
        self
    }

    /// Reconcile asset references between `old` and `new` content.
    ///
    /// `old` is absent on create. `new` is mutated in place: each image
    /// node that is new or whose prompt changed gets its `__image_url__`
    /// rewritten to the fetched location, so callers must re-read `new`
    /// after this returns. On error nothing is mutated and no assets are
    /// returned; the caller aborts the enclosing operation.
    pub async fn reconcile(
        &self,
        presentation: Uuid,
        old: Option<&SlideContent>,
        new: &mut SlideContent,
    ) -> Result<Vec<ImageAsset>, GenerationError> {
        let old_prompts = old.map(prompts_by_pointer).unwrap_or_default();

        let mut next = Value::Object(new.0.clone());
        let nodes = image_nodes(&next);

        let mut created = Vec::new();
        for node in nodes {
            let unchanged = old_prompts.get(&node.pointer) == Some(&node.prompt);
            if unchanged && node.resolved {
                continue;
            }

            let prompt = ImagePrompt::new(node.prompt).with_presentation(presentation);
            let mut asset = self.fetcher.fetch(&prompt).await?;

            if let Some(storage) = &self.storage {
                if let Some(key) = storage
                    .put(Path::new(&asset.path), Some(&presentation.to_string()))
                    .await
                {
                    asset = asset.uploaded(key);
                }
            }

            let location = asset
                .object_key
                .clone()
                .unwrap_or_else(|| asset.path.clone());
            if let Some(Value::Object(obj)) = next.pointer_mut(&node.pointer) {
                obj.insert(IMAGE_URL_KEY.to_string(), Value::String(location));
            }
            created.push(asset);
        }

        if let Value::Object(map) = next {
            new.0 = map;
        }
        Ok(created)
    }
}

/// One image node found in a content tree.
struct ImageNode {
    /// JSON pointer to the node
    pointer: String,
    prompt: String,
    /// Whether the node already carries a resolved location
    resolved: bool,
}

/// Collect image nodes in document order.
fn image_nodes(value: &Value) -> Vec<ImageNode> {
    let mut nodes = Vec::new();
    walk(value, String::new(), &mut |pointer, obj| {
        if let Some(prompt) = obj.get(IMAGE_PROMPT_KEY).and_then(Value::as_str) {
            let resolved = obj
                .get(IMAGE_URL_KEY)
                .and_then(Value::as_str)
                .is_some_and(|url| !url.is_empty());
            nodes.push(ImageNode {
                pointer: pointer.to_string(),
                prompt: prompt.to_string(),
                resolved,
            });
        }
    });
    nodes
}

/// Map of JSON pointer to prompt for every image node in `content`.
fn prompts_by_pointer(content: &SlideContent) -> HashMap<String, String> {
    image_nodes(&content.as_value())
        .into_iter()
        .map(|node| (node.pointer, node.prompt))
        .collect()
}

fn walk(
    value: &Value,
    pointer: String,
    visit: &mut impl FnMut(&str, &serde_json::Map<String, Value>),
) {
    match value {
        Value::Object(obj) => {
            visit(&pointer, obj);
            for (key, child) in obj {
                walk(child, format!("{pointer}/{}", escape_pointer(key)), visit);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, format!("{pointer}/{i}"), visit);
            }
        }
        _ => {}
    }
}

/// RFC 6901 escaping for JSON pointer segments.
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
