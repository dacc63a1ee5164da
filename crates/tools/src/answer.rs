//! Answer tool: writes the grounded reply from the selected sources.
//!
//! Source texts never enter the transcript. They live in the dossier and
//! reach the model only here, inside the answer prompt.

use async_trait::async_trait;
use tess_core::error::ToolError;
use tess_core::tool::{Tool, parse_arguments, string_parameter_schema};
use tess_core::{Dossier, Outcome};
use tracing::{debug, info};

use crate::prompts::{ANSWER_TEMPLATE, fill, format_sources};
use crate::{ModelClient, QueryArgs};

pub struct AnswerTool {
    client: ModelClient,
}

impl AnswerTool {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Render the answer prompt for `query` against the dossier's selection.
    pub fn build_prompt(query: &str, dossier: &Dossier) -> String {
        let legislation = format_sources(&dossier.selected_legislation());
        let case_law = format_sources(&dossier.selected_case_law());
        fill(
            ANSWER_TEMPLATE,
            &[
                ("query", query),
                ("legislation", legislation.as_str()),
                ("case_law", case_law.as_str()),
            ],
        )
    }
}

#[async_trait]
impl Tool for AnswerTool {
    fn name(&self) -> &str {
        "generate_tax_answer"
    }

    fn description(&self) -> &str {
        "Beantwoord een belastingvraag op basis van de geselecteerde bronnen in het dossier."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        string_parameter_schema(
            "query",
            "De oorspronkelijke belastingvraag van de gebruiker, met alle context die nodig is om \
             haar juist te beantwoorden.",
        )
    }

    async fn execute(
        &self,
        dossier: &Dossier,
        arguments: serde_json::Value,
    ) -> Result<Outcome, ToolError> {
        let args: QueryArgs = parse_arguments(arguments)?;
        let query = args.query.trim();
        if query.is_empty() {
            return Ok(Outcome::from_error(&ToolError::Validation(
                "query cannot be empty".into(),
            )));
        }

        let prompt = Self::build_prompt(query, dossier);
        debug!(
            legislation = dossier.selected_legislation().len(),
            case_law = dossier.selected_case_law().len(),
            "Generating answer"
        );

        let response = self
            .client
            .provider
            .complete(self.client.request(prompt))
            .await
            .map_err(|e| ToolError::External {
                tool_name: self.name().to_string(),
                reason: e.to_string(),
            })?;

        let answer = response.message.content.trim();
        if answer.is_empty() {
            return Err(ToolError::External {
                tool_name: self.name().to_string(),
                reason: "model returned an empty answer".into(),
            });
        }

        info!(chars = answer.len(), "Answer generated");
        Ok(Outcome::message(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::NO_SOURCES;
    use std::sync::Arc;
    use tess_core::{Document, Patch};
    use tess_providers::ScriptedProvider;

    fn tool(provider: Arc<ScriptedProvider>) -> AnswerTool {
        AnswerTool::new(ModelClient::new(provider, "gpt-4o", 0.0))
    }

    #[tokio::test]
    async fn answers_from_selected_sources_only() {
        let provider = Arc::new(ScriptedProvider::text("  Het tarief is 21%.  "));
        let mut dossier = Dossier::new("dos-1");
        Patch::add_and_select_legislation(vec![
            Document::new("Wet OB art 2", "Het btw-tarief is 21%"),
            Document::new("Wet VPB art 13", "deelnemingsvrijstelling"),
        ])
        .apply(&mut dossier);
        Patch::unselect(vec!["Wet VPB art 13".into()]).apply(&mut dossier);

        let outcome = tool(provider.clone())
            .execute(&dossier, serde_json::json!({"query": "Wat is het btw-tarief?"}))
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.patch.is_none());
        assert_eq!(outcome.direct_message(), Some("Het tarief is 21%."));

        let requests = provider.requests();
        let prompt = &requests[0].messages[0].content;
        assert!(prompt.contains("1:\nWet OB art 2\nHet btw-tarief is 21%"));
        assert!(!prompt.contains("deelnemingsvrijstelling"));
        assert!(prompt.contains("Wat is het btw-tarief?"));
        // No case law selected
        assert!(prompt.contains(NO_SOURCES));
        assert!(requests[0].tools.is_empty());
        assert!(requests[0].response_format.is_none());
    }

    #[test]
    fn prompt_without_any_selection_uses_placeholders() {
        let prompt = AnswerTool::build_prompt("vraag", &Dossier::new("dos-1"));
        assert_eq!(prompt.matches(NO_SOURCES).count(), 2);
    }

    #[tokio::test]
    async fn proceeds_with_no_sources() {
        let provider = Arc::new(ScriptedProvider::text("Er zijn onvoldoende bronnen."));
        let outcome = tool(provider)
            .execute(&Dossier::new("dos-1"), serde_json::json!({"query": "vraag"}))
            .await
            .unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn blank_model_answer_is_an_error() {
        let provider = Arc::new(ScriptedProvider::text("   "));
        let err = tool(provider)
            .execute(&Dossier::new("dos-1"), serde_json::json!({"query": "vraag"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::External { .. }));
    }
}
