//! Provider trait: the abstraction over the language-model collaborator.
//!
//! A Provider sends a list of messages (optionally with tool definitions)
//! to an LLM and returns one assistant message, which may carry tool calls.
//! When a [`ResponseFormat`] is set, the provider must answer with a JSON
//! object matching its schema; [`complete_structured`] parses that object.
//!
//! Implementations: OpenAI-compatible endpoints, scripted mocks in tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4o")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Structured output contract (no tools are offered in this mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ProviderRequest {
    /// A plain request with a single user prompt.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(prompt)],
            temperature,
            max_tokens: None,
            tools: Vec::new(),
            response_format: None,
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A named JSON schema the response must conform to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: serde_json::Value,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

/// Run a structured-mode request and decode the JSON answer into `T`.
pub async fn complete_structured<T: DeserializeOwned>(
    provider: &dyn Provider,
    request: ProviderRequest,
) -> Result<T, ProviderError> {
    if request.response_format.is_none() {
        return Err(ProviderError::NotConfigured(
            "structured completion requires a response format".into(),
        ));
    }
    let response = provider.complete(request).await?;
    let raw = strip_code_fence(&response.message.content);
    serde_json::from_str(raw).map_err(|e| {
        ProviderError::InvalidResponse(format!("structured output did not match schema: {e}"))
    })
}

/// Some models wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
