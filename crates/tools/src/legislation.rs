//! Legislation retrieval tool.
//!
//! Returns a fixed sample of Dutch tax legislation and selects it. The
//! query is accepted but not used for ranking yet.

use async_trait::async_trait;
use tess_core::error::ToolError;
use tess_core::tool::{Tool, parse_arguments, string_parameter_schema};
use tess_core::{Document, Dossier, Outcome, Patch};
use tracing::debug;

use crate::QueryArgs;

pub struct LegislationTool {
    samples: Vec<Document>,
}

impl LegislationTool {
    pub fn new() -> Self {
        Self {
            samples: sample_legislation(),
        }
    }

    /// Serve a custom document set instead of the built-in samples.
    pub fn with_documents(samples: Vec<Document>) -> Self {
        Self { samples }
    }
}

impl Default for LegislationTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for LegislationTool {
    fn name(&self) -> &str {
        "get_legislation"
    }

    fn description(&self) -> &str {
        "Zoek relevante wetgeving bij een belastingvraag en voeg die toe aan het dossier."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        string_parameter_schema(
            "query",
            "De belastingvraag of het onderwerp, met alle context die helpt om de juiste wetgeving te vinden.",
        )
    }

    async fn execute(
        &self,
        _dossier: &Dossier,
        arguments: serde_json::Value,
    ) -> Result<Outcome, ToolError> {
        let args: QueryArgs = parse_arguments(arguments)?;
        debug!(query = %args.query, count = self.samples.len(), "Retrieving legislation");

        let patch = Patch::add_and_select_legislation(self.samples.clone());
        let titles = patch.added_titles();
        Ok(Outcome::patched(patch).with_data(serde_json::json!({ "titles": titles })))
    }
}

fn sample_legislation() -> Vec<Document> {
    vec![
        Document::new(
            "Wet op de vennootschapsbelasting 1969, artikel 13",
            "De deelnemingsvrijstelling zorgt ervoor dat een vennootschap geen \
             vennootschapsbelasting betaalt over dividenden en vervreemdingswinsten uit een \
             kwalificerende deelneming. Zo wordt voorkomen dat dezelfde winst twee keer wordt \
             belast. Voorwaarde is onder meer dat de moedermaatschappij ten minste 5% van het \
             nominaal gestorte kapitaal van de dochter houdt.",
        ),
        Document::new(
            "Wet op de omzetbelasting 1968, artikel 2",
            "Het algemene btw-tarief op de levering van goederen bedraagt 21%.",
        ),
    ]
}
