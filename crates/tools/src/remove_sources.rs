//! Removal tool: turns an instruction like "haal artikel 13 weg" into
//! titles to unselect.

use async_trait::async_trait;
use serde::Deserialize;
use tess_core::error::ToolError;
use tess_core::tool::{Tool, parse_arguments, string_parameter_schema};
use tess_core::{Dossier, Outcome, Patch};

use crate::ModelClient;
use crate::prompts::{REMOVE_TEMPLATE, fill};
use crate::selection::choose_titles;

#[derive(Debug, Deserialize)]
struct RemoveArgs {
    instruction: String,
}

pub struct RemoveSourcesTool {
    client: ModelClient,
}

impl RemoveSourcesTool {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for RemoveSourcesTool {
    fn name(&self) -> &str {
        "remove_sources"
    }

    fn description(&self) -> &str {
        "Haal de bronnen die de gebruiker noemt uit de selectie van het dossier."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        string_parameter_schema(
            "instruction",
            "De instructie van de gebruiker over welke bronnen weg moeten, bijvoorbeeld \
             'verwijder artikel 13 en ECLI:NL:HR:2020:123 uit de selectie'.",
        )
    }

    async fn execute(
        &self,
        dossier: &Dossier,
        arguments: serde_json::Value,
    ) -> Result<Outcome, ToolError> {
        let args: RemoveArgs = parse_arguments(arguments)?;
        let instruction = args.instruction.trim();
        if instruction.is_empty() {
            return Ok(Outcome::from_error(&ToolError::Validation(
                "instruction cannot be empty".into(),
            )));
        }

        let candidates = dossier.selected_titles();
        if candidates.is_empty() {
            return Ok(Outcome::from_error(&ToolError::NoCandidates(
                "no selected sources available to remove".into(),
            )));
        }

        let listing = candidates.join("\n");
        let prompt = fill(
            REMOVE_TEMPLATE,
            &[("instruction", instruction), ("candidates", listing.as_str())],
        );
        let titles = choose_titles(&self.client, self.name(), prompt, &candidates).await?;
        if titles.is_empty() {
            return Ok(Outcome::from_error(&ToolError::NoCandidates(
                "no titles matched for removal".into(),
            )));
        }

        let data = serde_json::json!({ "titles": titles });
        Ok(Outcome::patched(Patch::unselect(titles)).with_data(data))
    }
}
