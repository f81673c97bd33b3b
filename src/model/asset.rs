//! Image prompts and generated asset records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Prompt for one image to be generated or fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePrompt {
    pub prompt: String,

    /// Optional theme fragment appended to the prompt when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_prompt: Option<String>,

    /// Presentation the image belongs to, used to group uploads in object
    /// storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_id: Option<Uuid>,
}

impl ImagePrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            theme_prompt: None,
            presentation_id: None,
        }
    }

    pub fn with_presentation(mut self, presentation_id: Uuid) -> Self {
        self.presentation_id = Some(presentation_id);
        self
    }

    /// The prompt handed to the image collaborator.
    pub fn effective(&self, with_theme: bool) -> String {
        match (&self.theme_prompt, with_theme) {
            (Some(theme), true) => format!("{}, {}", self.prompt, theme),
            _ => self.prompt.clone(),
        }
    }
}

/// Record of one generated or fetched visual asset.
///
/// Created by asset reconciliation and persisted in the same commit as the
/// slide mutation that produced it. Never garbage-collected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    /// Whether the file has been pushed to object storage
    pub is_uploaded: bool,

    /// Local path of the generated file
    pub path: String,

    /// Object-storage key, once uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,

    /// Free-form metadata from the generating service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Value>,
}

impl ImageAsset {
    /// A freshly generated, not-yet-uploaded asset.
    pub fn new(path: impl Into<String>, extras: Option<Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            is_uploaded: false,
            path: path.into(),
            object_key: None,
            extras,
        }
    }

    /// Mark the asset as uploaded under `key`.
    pub fn uploaded(mut self, key: impl Into<String>) -> Self {
        self.is_uploaded = true;
        self.object_key = Some(key.into());
        self
    }
}
