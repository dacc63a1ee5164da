//! Slash commands handled before the model is consulted.
//!
//! Only exact commands are recognized. Everything else, including
//! free-text requests to drop a source, goes to the model.

use tess_core::Dossier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// List collected sources and their selection state
    Sources,
    /// Delete the dossier
    Reset,
    Help,
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "/bronnen" | "/sources" => Some(Self::Sources),
            "/reset" => Some(Self::Reset),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

pub const HELP_TEXT: &str = "Beschikbare opdrachten:
/bronnen  toon de verzamelde bronnen en welke geselecteerd zijn
/reset    wis dit dossier en begin opnieuw
/help     toon deze hulp

Stel verder gewoon uw belastingvraag.";

pub const RESET_DONE: &str = "Het dossier is gewist. U kunt opnieuw beginnen.";
pub const RESET_NOTHING: &str = "Er was nog geen dossier om te wissen.";
pub const NO_SOURCES_YET: &str = "Er zijn nog geen bronnen verzameld.";

/// Render the `/bronnen` overview.
pub fn render_sources(dossier: &Dossier) -> String {
    if dossier.titles().is_empty() {
        return NO_SOURCES_YET.to_string();
    }

    let mut out = String::from("Bronnen in dit dossier:");
    for (heading, docs) in [
        ("Wetgeving", &dossier.legislation),
        ("Jurisprudentie", &dossier.case_law),
    ] {
        let titles: Vec<&str> = docs.iter().filter_map(|d| d.key()).collect();
        if titles.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{heading}:"));
        for title in titles {
            let mark = if dossier.is_selected(title) { "x" } else { " " };
            out.push_str(&format!("\n[{mark}] {title}"));
        }
    }
    out
}
