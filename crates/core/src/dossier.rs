//! The dossier: a session's durable state.
//!
//! A dossier holds the documents collected so far, the ordered selection
//! overlay on top of them, and the user-visible transcript. It is created
//! on first contact with an id, mutated once per turn (patches + transcript
//! appends), and persisted at the end of the turn.
//!
//! `selected_ids` is an insertion-ordered set of titles. Entries may go
//! stale (reference no collected document); queries simply skip those.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::Document;
use crate::message::{Message, Role};

/// Unique identifier for a dossier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DossierId(pub String);

impl DossierId {
    /// Generate a fresh id of the form `dos-1a2b3c4d`.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("dos-{}", &hex[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DossierId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DossierId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for DossierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collected sources, selection state, and transcript for one conversation.
///
/// The serde shape is the persisted snapshot:
/// `{dossier_id, legislation, case_law, selected_ids, conversation}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    #[serde(rename = "dossier_id")]
    pub id: DossierId,

    #[serde(default)]
    pub legislation: Vec<Document>,

    #[serde(default)]
    pub case_law: Vec<Document>,

    #[serde(default)]
    pub selected_ids: Vec<String>,

    #[serde(default)]
    pub conversation: Vec<Message>,
}

impl Dossier {
    /// Create an empty dossier.
    pub fn new(id: impl Into<DossierId>) -> Self {
        Self {
            id: id.into(),
            legislation: Vec::new(),
            case_law: Vec::new(),
            selected_ids: Vec::new(),
            conversation: Vec::new(),
        }
    }

    fn documents(&self) -> impl Iterator<Item = &Document> {
        self.legislation.iter().chain(self.case_law.iter())
    }

    /// All addressable titles, legislation first.
    pub fn titles(&self) -> Vec<String> {
        self.documents()
            .filter_map(|d| d.key())
            .map(str::to_string)
            .collect()
    }

    pub fn is_selected(&self, title: &str) -> bool {
        self.selected_ids.iter().any(|t| t == title)
    }

    /// Titles of collected documents that are currently selected.
    pub fn selected_titles(&self) -> Vec<String> {
        self.documents()
            .filter_map(|d| d.key())
            .filter(|t| self.is_selected(t))
            .map(str::to_string)
            .collect()
    }

    /// Titles of collected documents that are currently not selected.
    pub fn unselected_titles(&self) -> Vec<String> {
        self.documents()
            .filter_map(|d| d.key())
            .filter(|t| !self.is_selected(t))
            .map(str::to_string)
            .collect()
    }

    pub fn selected_legislation(&self) -> Vec<&Document> {
        self.legislation
            .iter()
            .filter(|d| d.key().is_some_and(|t| self.is_selected(t)))
            .collect()
    }

    pub fn selected_case_law(&self) -> Vec<&Document> {
        self.case_law
            .iter()
            .filter(|d| d.key().is_some_and(|t| self.is_selected(t)))
            .collect()
    }

    /// Append a user message. Blank content is ignored.
    pub fn push_user(&mut self, content: &str) {
        self.push(Role::User, content);
    }

    /// Append an assistant message. Blank content is ignored.
    pub fn push_assistant(&mut self, content: &str) {
        self.push(Role::Assistant, content);
    }

    fn push(&mut self, role: Role, content: &str) {
        if content.trim().is_empty() {
            return;
        }
        let message = match role {
            Role::User => Message::user(content),
            Role::Assistant => Message::assistant(content),
            Role::System => Message::system(content),
        };
        self.conversation.push(message);
    }
}
