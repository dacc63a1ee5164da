//! Case-law retrieval tool.
//!
//! Returns a fixed sample of Dutch tax rulings (ECLI numbers) and selects them.

use async_trait::async_trait;
use tess_core::error::ToolError;
use tess_core::tool::{Tool, parse_arguments, string_parameter_schema};
use tess_core::{Document, Dossier, Outcome, Patch};
use tracing::debug;

use crate::QueryArgs;

pub struct CaseLawTool {
    samples: Vec<Document>,
}

impl CaseLawTool {
    pub fn new() -> Self {
        Self {
            samples: sample_case_law(),
        }
    }

    pub fn with_documents(samples: Vec<Document>) -> Self {
        Self { samples }
    }
}

impl Default for CaseLawTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CaseLawTool {
    fn name(&self) -> &str {
        "get_case_law"
    }

    fn description(&self) -> &str {
        "Zoek relevante jurisprudentie bij een belastingvraag en voeg die toe aan het dossier."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        string_parameter_schema(
            "query",
            "De belastingvraag of het onderwerp, met alle context die helpt om de juiste uitspraken te vinden.",
        )
    }

    async fn execute(
        &self,
        _dossier: &Dossier,
        arguments: serde_json::Value,
    ) -> Result<Outcome, ToolError> {
        let args: QueryArgs = parse_arguments(arguments)?;
        debug!(query = %args.query, count = self.samples.len(), "Retrieving case law");

        let patch = Patch::add_and_select_case_law(self.samples.clone());
        let titles = patch.added_titles();
        Ok(Outcome::patched(patch).with_data(serde_json::json!({ "titles": titles })))
    }
}

fn sample_case_law() -> Vec<Document> {
    vec![
        Document::new(
            "ECLI:NL:HR:2020:123",
            "Geschil over de btw-classificatie en het toe te passen tarief. Op tandpasta is \
             het 0%-tarief van toepassing.",
        ),
        Document::new(
            "ECLI:NL:RBAMS:2021:456",
            "Voor toepassing van de deelnemingsvrijstelling is een zakelijk motief vereist.",
        ),
    ]
}
