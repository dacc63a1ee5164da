//! The turn controller: one user message in, one reply out.
//!
//! A turn loads the dossier, appends the user's text, asks the model once,
//! and either returns the model's text or runs its tool calls through the
//! engine and presenter. There is no second model round in the same turn.
//! The dossier is saved once, at the end.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tess_core::event::{DomainEvent, EventBus};
use tess_core::provider::{Provider, ProviderRequest};
use tess_core::error::StoreError;
use tess_core::tool::ToolCall;
use tess_core::{Dossier, DossierId, DossierStore, Message, Outcome};
use tess_store::DossierLocks;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};

use crate::commands::{self, Command};
use crate::engine::ToolCallEngine;
use crate::presenter::present;
use crate::prompts::SYSTEM_PROMPT;

/// Shown when the model cannot be reached. Nothing is persisted.
pub const APOLOGY: &str = "Er is een onverwachte fout opgetreden. Probeer het opnieuw.";

/// What one turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub dossier_id: String,
    pub text: String,
    pub outcomes: Vec<Outcome>,
    /// Whether the dossier was saved at the end of the turn
    pub persisted: bool,
}

pub struct TurnController {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    system_prompt: String,
    engine: ToolCallEngine,
    store: Arc<dyn DossierStore>,
    locks: Option<DossierLocks>,
    event_bus: Arc<EventBus>,
}

impl TurnController {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        engine: ToolCallEngine,
        store: Arc<dyn DossierStore>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            system_prompt: SYSTEM_PROMPT.to_string(),
            engine,
            store,
            locks: Some(DossierLocks::new()),
            event_bus,
        }
    }

    /// Wire a controller from configuration: the five tools, the engine,
    /// and the system prompt (or its override).
    pub fn from_config(
        config: &tess_config::AppConfig,
        provider: Arc<dyn Provider>,
        store: Arc<dyn DossierStore>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let client = tess_tools::ModelClient::new(
            provider.clone(),
            &config.default_model,
            config.default_temperature,
        )
        .with_max_tokens(config.default_max_tokens);
        let registry = Arc::new(tess_tools::default_registry(client));
        let engine = ToolCallEngine::new(registry, event_bus.clone())
            .with_parallel(config.engine.parallel_tools);

        let mut controller = Self::new(provider, &config.default_model, engine, store, event_bus)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_locking(config.engine.lock_dossiers);
        if let Some(prompt) = &config.prompts.system_prompt_override {
            controller = controller.with_system_prompt(prompt.clone());
        }
        controller
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Serialize turns per dossier id (on by default).
    pub fn with_locking(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(DossierLocks::new);
        self
    }

    pub fn engine(&self) -> &ToolCallEngine {
        &self.engine
    }

    pub fn store(&self) -> &Arc<dyn DossierStore> {
        &self.store
    }

    /// Delete a dossier, waiting for any turn on it to finish first.
    /// Returns whether anything was stored under `id`.
    pub async fn reset(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock(id).await;
        self.reset_unlocked(id).await
    }

    async fn reset_unlocked(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self.store.reset(id).await?;
        if deleted {
            info!(dossier_id = %id, "Dossier reset");
        }
        Ok(deleted)
    }

    async fn lock(&self, id: &str) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(id).await),
            None => None,
        }
    }

    /// Handle one user message.
    ///
    /// Without a (non-blank) `dossier_id` a fresh dossier is started. Blank
    /// text is ignored: no model call, nothing saved. Store failures while
    /// loading are returned as errors; model failures become the apology
    /// reply and leave the stored dossier untouched.
    pub async fn handle(
        &self,
        dossier_id: Option<&str>,
        text: &str,
    ) -> Result<TurnReply, tess_core::Error> {
        let id = match dossier_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => DossierId::generate().to_string(),
        };

        if text.trim().is_empty() {
            debug!(dossier_id = %id, "Blank message ignored");
            return Ok(TurnReply {
                dossier_id: id,
                text: String::new(),
                outcomes: Vec::new(),
                persisted: false,
            });
        }

        let _guard = self.lock(&id).await;

        if let Some(command) = Command::parse(text) {
            return self.run_command(id, command).await;
        }

        let mut dossier = self.store.get_or_create(&id).await?;
        dossier.push_user(text);
        info!(dossier_id = %id, messages = dossier.conversation.len(), "Processing turn");

        let request = self.build_request(&dossier);
        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(dossier_id = %id, error = %e, "Model call failed");
                self.event_bus.publish(DomainEvent::ErrorOccurred {
                    context: format!("turn:{id}"),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                return Ok(TurnReply {
                    dossier_id: id,
                    text: APOLOGY.to_string(),
                    outcomes: Vec::new(),
                    persisted: false,
                });
            }
        };

        let (text, outcomes) = if response.message.tool_calls.is_empty() {
            debug!(dossier_id = %id, "Direct reply without tool calls");
            let text = response.message.content;
            dossier.push_assistant(&text);
            (text, Vec::new())
        } else {
            let calls: Vec<ToolCall> = response
                .message
                .tool_calls
                .into_iter()
                .map(|tc| ToolCall {
                    id: tc.id,
                    name: tc.name,
                    arguments: tc.arguments,
                })
                .collect();
            debug!(
                dossier_id = %id,
                tools = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "Model requested tool calls"
            );

            let outcomes = self.engine.run(&mut dossier, &calls).await;
            let answers: Vec<&str> = outcomes.iter().filter_map(|o| o.direct_message()).collect();
            let text = if answers.is_empty() {
                let text = present(&outcomes, Some(&dossier));
                dossier.push_assistant(&text);
                text
            } else {
                // The engine already transcribed these.
                answers.join("\n\n")
            };
            (text, outcomes)
        };

        let persisted = match self.store.save(&dossier).await {
            Ok(()) => true,
            Err(e) => {
                warn!(dossier_id = %id, error = %e, "Failed to persist dossier");
                self.event_bus.publish(DomainEvent::ErrorOccurred {
                    context: format!("save:{id}"),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                false
            }
        };

        self.event_bus.publish(DomainEvent::TurnCompleted {
            dossier_id: id.clone(),
            tool_calls: outcomes.len(),
            persisted,
            timestamp: Utc::now(),
        });
        info!(dossier_id = %id, tool_calls = outcomes.len(), persisted, "Turn completed");

        Ok(TurnReply {
            dossier_id: id,
            text,
            outcomes,
            persisted,
        })
    }

    fn build_request(&self, dossier: &Dossier) -> ProviderRequest {
        let mut messages = Vec::with_capacity(dossier.conversation.len() + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(dossier.conversation.iter().cloned());
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: self.engine.tools().definitions(),
            response_format: None,
        }
    }

    async fn run_command(
        &self,
        id: String,
        command: Command,
    ) -> Result<TurnReply, tess_core::Error> {
        debug!(dossier_id = %id, ?command, "Handling command");
        let text = match command {
            Command::Help => commands::HELP_TEXT.to_string(),
            Command::Sources => {
                let dossier = self.store.get_or_create(&id).await?;
                commands::render_sources(&dossier)
            }
            Command::Reset => {
                // The turn already holds the lock for `id`.
                if self.reset_unlocked(&id).await? {
                    commands::RESET_DONE.to_string()
                } else {
                    commands::RESET_NOTHING.to_string()
                }
            }
        };
        Ok(TurnReply {
            dossier_id: id,
            text,
            outcomes: Vec::new(),
            persisted: false,
        })
    }
}
