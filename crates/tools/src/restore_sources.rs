//! Restoration tool: selects previously unselected sources again.

use async_trait::async_trait;
use tess_core::error::ToolError;
use tess_core::tool::{Tool, parse_arguments, string_parameter_schema};
use tess_core::{Dossier, Outcome, Patch};

use crate::prompts::{RESTORE_TEMPLATE, fill};
use crate::selection::choose_titles;
use crate::{ModelClient, QueryArgs};

pub struct RestoreSourcesTool {
    client: ModelClient,
}

impl RestoreSourcesTool {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for RestoreSourcesTool {
    fn name(&self) -> &str {
        "restore_sources"
    }

    fn description(&self) -> &str {
        "Zet eerder verwijderde bronnen uit het dossier weer in de selectie."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        string_parameter_schema(
            "query",
            "Het verzoek van de gebruiker over welke bronnen terug moeten, bijvoorbeeld \
             'zet artikel 13 terug'.",
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

        let candidates = dossier.unselected_titles();
        if candidates.is_empty() {
            return Ok(Outcome::from_error(&ToolError::NoCandidates(
                "no unselected sources available to restore".into(),
            )));
        }

        let listing = candidates.join("\n");
        let prompt = fill(
            RESTORE_TEMPLATE,
            &[("query", query), ("candidates", listing.as_str())],
        );
        let titles = choose_titles(&self.client, self.name(), prompt, &candidates).await?;
        if titles.is_empty() {
            return Ok(Outcome::from_error(&ToolError::NoCandidates(
                "no titles matched for restoration".into(),
            )));
        }

        let data = serde_json::json!({ "titles": titles });
        Ok(Outcome::patched(Patch::select(titles)).with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tess_core::Document;
    use tess_providers::ScriptedProvider;

    fn tool(provider: Arc<ScriptedProvider>) -> RestoreSourcesTool {
        RestoreSourcesTool::new(ModelClient::new(provider, "gpt-4o", 0.0))
    }

    /// L1 and C1 collected, only C1 still selected.
    fn dossier() -> Dossier {
        let mut dossier = Dossier::new("dos-1");
        Patch::add_and_select_legislation(vec![Document::new("L1", "a")]).apply(&mut dossier);
        Patch::add_and_select_case_law(vec![Document::new("C1", "b")]).apply(&mut dossier);
        Patch::unselect(vec!["L1".into()]).apply(&mut dossier);
        dossier
    }

    #[tokio::test]
    async fn selects_the_chosen_title() {
        let provider = Arc::new(ScriptedProvider::text(r#"{"titles": ["L1"]}"#));
        let mut dossier = dossier();
        let outcome = tool(provider.clone())
            .execute(&dossier, serde_json::json!({"query": "zet L1 terug"}))
            .await
            .unwrap();

        let patch = outcome.patch.unwrap();
        assert_eq!(patch.select_titles, vec!["L1"]);
        assert!(patch.unselect_titles.is_empty());
        patch.apply(&mut dossier);
        assert_eq!(dossier.selected_titles(), vec!["L1", "C1"]);

        // Only the unselected title is offered.
        let requests = provider.requests();
        let prompt = &requests[0].messages[0].content;
        assert!(prompt.contains("L1"));
        assert!(!prompt.contains("C1"));
    }

    #[tokio::test]
    async fn nothing_unselected_fails() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let mut all_selected = Dossier::new("dos-1");
        Patch::add_and_select_legislation(vec![Document::new("L1", "a")]).apply(&mut all_selected);

        let outcome = tool(provider.clone())
            .execute(&all_selected, serde_json::json!({"query": "herstel alles"}))
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(outcome.patch.is_none());
        assert_eq!(outcome.message, "no unselected sources available to restore");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_query_fails() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let outcome = tool(provider)
            .execute(&dossier(), serde_json::json!({"query": ""}))
            .await
            .unwrap();
        assert_eq!(outcome.message, "query cannot be empty");
    }

    #[tokio::test]
    async fn empty_model_answer_fails() {
        let provider = Arc::new(ScriptedProvider::text(r#"{"titles": []}"#));
        let outcome = tool(provider)
            .execute(&dossier(), serde_json::json!({"query": "zet iets terug"}))
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "no titles matched for restoration");
    }
}
