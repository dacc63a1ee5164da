//! Tool implementations for TESS.
//!
//! Two retrieval tools collect sources into the dossier, two
//! selection-editing tools let the user narrow or widen the working set,
//! and the answer tool writes the grounded reply. None of them mutate the
//! dossier: they return an `Outcome` whose patch the engine applies.
//!
//! The retrieval tools serve a fixed sample set until a real search
//! backend is wired in.

pub mod answer;
pub mod case_law;
pub mod legislation;
pub mod prompts;
pub mod remove_sources;
pub mod restore_sources;
mod selection;

use std::sync::Arc;

use serde::Deserialize;
use tess_core::provider::{Provider, ProviderRequest};
use tess_core::tool::ToolRegistry;

pub use answer::AnswerTool;
pub use case_law::CaseLawTool;
pub use legislation::LegislationTool;
pub use remove_sources::RemoveSourcesTool;
pub use restore_sources::RestoreSourcesTool;

/// The model settings tools use for their own language-model calls.
#[derive(Clone)]
pub struct ModelClient {
    pub provider: Arc<dyn Provider>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// A single-prompt request with these settings.
    fn request(&self, prompt: String) -> ProviderRequest {
        let mut request = ProviderRequest::prompt(&self.model, prompt, self.temperature);
        request.max_tokens = self.max_tokens;
        request
    }
}

/// Arguments of the tools that take a free-text `query`.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryArgs {
    pub query: String,
}

/// Create the tool registry with all five tools, in the order their
/// schemas are offered to the model.
pub fn default_registry(client: ModelClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(LegislationTool::new()));
    registry.register(Box::new(CaseLawTool::new()));
    registry.register(Box::new(RemoveSourcesTool::new(client.clone())));
    registry.register(Box::new(RestoreSourcesTool::new(client.clone())));
    registry.register(Box::new(AnswerTool::new(client)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use tess_providers::ScriptedProvider;

    #[test]
    fn default_registry_is_valid_and_ordered() {
        let client = ModelClient::new(Arc::new(ScriptedProvider::new(vec![])), "gpt-4o", 0.0);
        let registry = default_registry(client);
        assert!(registry.validate().is_ok());
        assert_eq!(
            registry.names(),
            vec![
                "get_legislation",
                "get_case_law",
                "remove_sources",
                "restore_sources",
                "generate_tax_answer"
            ]
        );
    }

    #[test]
    fn client_request_carries_settings() {
        let client = ModelClient::new(Arc::new(ScriptedProvider::new(vec![])), "gpt-4o", 0.2)
            .with_max_tokens(512);
        let request = client.request("vraag".into());
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, Some(512));
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }
}
