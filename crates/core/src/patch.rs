//! Patch: an immutable delta against a [`Dossier`].
//!
//! `apply` runs strictly in this order:
//!
//! 1. merge `add_legislation` / `add_case_law`, skipping titles already
//!    present in the same collection (trimmed, case-sensitive)
//! 2. remove `unselect_titles` from the selection
//! 3. add `select_titles` to the selection, first-seen order, no duplicates
//!
//! Unselect runs before select so a single patch can retract a title and
//! re-add it, with the add winning. Blank titles are dropped at every step.
//! Applying the same patch twice leaves the dossier as applying it once.

use serde::{Deserialize, Serialize};

use crate::document::{Document, normalize_title};
use crate::dossier::Dossier;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_legislation: Vec<Document>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_case_law: Vec<Document>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select_titles: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unselect_titles: Vec<String>,
}

impl Patch {
    /// A patch that adds legislation and selects it.
    pub fn add_and_select_legislation(items: Vec<Document>) -> Self {
        let titles = titles_of(&items);
        Self {
            add_legislation: items,
            select_titles: titles,
            ..Self::default()
        }
    }

    /// A patch that adds case law and selects it.
    pub fn add_and_select_case_law(items: Vec<Document>) -> Self {
        let titles = titles_of(&items);
        Self {
            add_case_law: items,
            select_titles: titles,
            ..Self::default()
        }
    }

    pub fn select(titles: Vec<String>) -> Self {
        Self {
            select_titles: titles,
            ..Self::default()
        }
    }

    pub fn unselect(titles: Vec<String>) -> Self {
        Self {
            unselect_titles: titles,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add_legislation.is_empty()
            && self.add_case_law.is_empty()
            && self.select_titles.is_empty()
            && self.unselect_titles.is_empty()
    }

    /// Whether this patch adds any documents.
    pub fn adds_documents(&self) -> bool {
        !self.add_legislation.is_empty() || !self.add_case_law.is_empty()
    }

    /// Titles of all documents this patch adds, legislation first.
    pub fn added_titles(&self) -> Vec<String> {
        let mut titles = titles_of(&self.add_legislation);
        titles.extend(titles_of(&self.add_case_law));
        titles
    }

    /// Apply this patch to a dossier in place.
    pub fn apply(&self, dossier: &mut Dossier) {
        merge_documents(&mut dossier.legislation, &self.add_legislation);
        merge_documents(&mut dossier.case_law, &self.add_case_law);

        if !self.unselect_titles.is_empty() {
            let removed: Vec<&str> = self
                .unselect_titles
                .iter()
                .filter_map(|t| normalize_title(t))
                .collect();
            dossier
                .selected_ids
                .retain(|t| !removed.contains(&t.trim()));
        }

        for title in self.select_titles.iter().filter_map(|t| normalize_title(t)) {
            if !dossier.is_selected(title) {
                dossier.selected_ids.push(title.to_string());
            }
        }
    }
}

fn titles_of(items: &[Document]) -> Vec<String> {
    items
        .iter()
        .filter_map(|d| d.key())
        .map(str::to_string)
        .collect()
}

fn merge_documents(existing: &mut Vec<Document>, incoming: &[Document]) {
    for item in incoming {
        let Some(title) = item.key() else {
            continue;
        };
        if existing.iter().any(|d| d.key() == Some(title)) {
            continue;
        }
        existing.push(Document::new(title, item.content.clone()));
    }
}
