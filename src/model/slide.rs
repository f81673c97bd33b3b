//! Slide records and their structured content documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::SPEAKER_NOTE_KEY;

/// Structured slide body produced by content generation.
///
/// A thin wrapper over a JSON object. The document is opaque to this backend
/// except for the reserved keys listed in [`crate::model`]: the speaker note
/// entry is mirrored into the slide record, and image nodes are rewritten by
/// asset reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideContent(pub Map<String, Value>);

impl SlideContent {
    /// Create an empty content document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The speaker note stored under the reserved key, defaulting to the
    /// empty string when absent or not a string.
    pub fn speaker_note(&self) -> String {
        self.0
            .get(SPEAKER_NOTE_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// View the document as a JSON value, e.g. for tree walks.
    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Number of top-level entries, reserved keys included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for SlideContent {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One slide of a presentation.
///
/// The `id` doubles as the content-version token consumed downstream: it is
/// reassigned exactly when the slide's content surface is replaced (via
/// [`Slide::replace_content`] or [`Slide::replace_html`]) and never for a
/// pure index shift caused by a neighboring insert or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub id: Uuid,

    /// Owning presentation
    pub presentation: Uuid,

    /// 0-based ordinal, unique and contiguous within the presentation
    pub index: u32,

    /// Layout slot identifier within the presentation's layout group
    pub layout: String,

    /// Name of the layout group the slot belongs to
    pub layout_group: Option<String>,

    /// Structured content document
    pub content: SlideContent,

    /// Mirror of the reserved speaker-note entry in `content`
    pub speaker_note: String,

    /// Raw markup override, when the slide is edited as HTML
    pub html_content: Option<String>,
}

impl Slide {
    /// Create a slide at `index` with a freshly assigned identity.
    pub fn new(
        presentation: Uuid,
        index: u32,
        layout: impl Into<String>,
        layout_group: Option<String>,
        content: SlideContent,
    ) -> Self {
        let speaker_note = content.speaker_note();
        Self {
            id: Uuid::new_v4(),
            presentation,
            index,
            layout: layout.into(),
            layout_group,
            content,
            speaker_note,
            html_content: None,
        }
    }

    /// Replace the structured content, reassigning identity.
    ///
    /// The new identity is how polling consumers detect that this row now
    /// represents different content.
    pub fn replace_content(&mut self, content: SlideContent, layout: impl Into<String>) {
        self.id = Uuid::new_v4();
        self.speaker_note = content.speaker_note();
        self.content = content;
        self.layout = layout.into();
    }

    /// Replace the HTML surface, reassigning identity.
    ///
    /// HTML edits bypass asset reconciliation; only the markup changes.
    pub fn replace_html(&mut self, html: String) {
        self.id = Uuid::new_v4();
        self.html_content = Some(html);
    }

    /// Shift the ordinal without touching identity.
    pub fn at_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }
}
