//! A provider that replays scripted responses.
//!
//! Used by offline tests across the workspace. Each `complete` call pops
//! the next response; the requests are recorded for later inspection.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tess_core::error::ProviderError;
use tess_core::message::{Message, MessageToolCall};
use tess_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// One plain text reply.
    pub fn text(text: &str) -> Self {
        Self::new(vec![Ok(text_response(text))])
    }

    /// Queue another response.
    pub fn push(&self, response: Result<ProviderResponse, ProviderError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }
        let next = self
            .responses
            .lock()
            .map_err(|_| ProviderError::NotConfigured("script lock poisoned".into()))?
            .pop_front();
        next.unwrap_or_else(|| Err(ProviderError::NotConfigured("script exhausted".into())))
    }
}

/// A plain text response (no tool calls).
pub fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "scripted-model".into(),
    }
}

/// A response that requests the given tool calls.
pub fn tool_call_response(calls: Vec<MessageToolCall>) -> ProviderResponse {
    let mut response = text_response("");
    response.message.tool_calls = calls;
    response
}

/// Build a tool call with JSON arguments.
pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}
