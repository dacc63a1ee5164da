//! Reference documents collected into a dossier.

use serde::{Deserialize, Serialize};

/// A legislation article or a case-law ruling.
///
/// The title doubles as the stable identifier; a document with a blank
/// title cannot be addressed by a selection and is never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,

    /// Full text; only fed to the model at answer time.
    #[serde(default)]
    pub content: String,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// The trimmed title, or `None` when it is blank.
    pub fn key(&self) -> Option<&str> {
        normalize_title(&self.title)
    }
}

/// Trim a title and reject blank ones.
pub fn normalize_title(title: &str) -> Option<&str> {
    let trimmed = title.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
