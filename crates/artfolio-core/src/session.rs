//! Editable vector state saved between editing sessions.

use crate::shapes::{Sticker, Stroke};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// Strokes and stickers as handed to the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub stickers: Vec<Sticker>,
    /// Where the flattened image of this session was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_uri: Option<String>,
}

impl SavedSession {
    pub fn new(strokes: Vec<Stroke>, stickers: Vec<Sticker>) -> Self {
        Self {
            strokes,
            stickers,
            drawing_uri: None,
        }
    }

    pub fn with_drawing_uri(mut self, uri: impl Into<String>) -> Self {
        self.drawing_uri = Some(uri.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.stickers.is_empty()
    }

    /// Serialize the session to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a session from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&Snapshot> for SavedSession {
    fn from(snapshot: &Snapshot) -> Self {
        Self::new(snapshot.strokes.clone(), snapshot.stickers.clone())
    }
}
