//! Turns a batch of outcomes into the text shown to the user.
//!
//! Block order is fixed: retrieved sources, removed sources, restored
//! sources, then direct tool messages. A batch that produced none of these
//! gets a neutral fallback.

use tess_core::{Dossier, Outcome};

pub const RETRIEVAL_HEADER: &str = "Ik vond de volgende bronnen:";
pub const RETRIEVAL_QUESTION: &str = "Zijn deze bronnen correct voor uw vraag?";
pub const REMOVAL_HEADER: &str = "Ik heb de volgende bronnen uit de selectie gehaald:";
pub const RESTORE_HEADER: &str = "Ik heb de volgende bronnen weer geselecteerd:";
pub const CURRENT_SELECTION_HEADER: &str = "Huidige selectie:";
pub const EMPTY_SELECTION: &str = "Er zijn nu geen bronnen geselecteerd.";
pub const NO_CHANGES: &str = "Ik heb geen wijzigingen aangebracht.";

/// Render the reply for one batch.
///
/// When `dossier` is the post-patch state, the removal block also echoes
/// the selection that remains.
pub fn present(outcomes: &[Outcome], dossier: Option<&Dossier>) -> String {
    let mut added = Vec::new();
    let mut unselected = Vec::new();
    let mut selected = Vec::new();

    for patch in outcomes.iter().filter_map(|o| o.patch.as_ref()) {
        for title in patch.added_titles() {
            push_unique(&mut added, &title);
        }
        for title in &patch.unselect_titles {
            push_unique(&mut unselected, title);
        }
        for title in &patch.select_titles {
            push_unique(&mut selected, title);
        }
    }

    let mut blocks = Vec::new();

    if !added.is_empty() {
        blocks.push(format!(
            "{RETRIEVAL_HEADER}\n{}\n{RETRIEVAL_QUESTION}",
            numbered(&added)
        ));
    }

    if !unselected.is_empty() {
        let mut block = format!("{REMOVAL_HEADER}\n{}", numbered(&unselected));
        if let Some(dossier) = dossier {
            let remaining = dossier.selected_titles();
            if remaining.is_empty() {
                block.push_str(&format!("\n{EMPTY_SELECTION}"));
            } else {
                block.push_str(&format!(
                    "\n{CURRENT_SELECTION_HEADER}\n{}",
                    numbered(&remaining)
                ));
            }
        }
        blocks.push(block);
    }

    // A retrieval tool selects what it adds; that is not a restoration.
    if !selected.is_empty() && added.is_empty() {
        blocks.push(format!("{RESTORE_HEADER}\n{}", numbered(&selected)));
    }

    for outcome in outcomes {
        if let Some(message) = outcome.direct_message() {
            blocks.push(message.to_string());
        }
    }

    if blocks.is_empty() {
        NO_CHANGES.to_string()
    } else {
        blocks.join("\n\n")
    }
}

fn push_unique(list: &mut Vec<String>, title: &str) {
    let title = title.trim();
    if !title.is_empty() && !list.iter().any(|t| t == title) {
        list.push(title.to_string());
    }
}

fn numbered(titles: &[String]) -> String {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {t}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
