//! The tool-call engine.
//!
//! Runs one batch of tool calls chosen by the model, then applies the
//! resulting patches to the dossier one by one, in request order. Tools
//! only ever see a shared borrow of the dossier; the engine is its single
//! writer.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use futures::future::join_all;
use tess_core::error::ToolError;
use tess_core::event::{DomainEvent, EventBus};
use tess_core::tool::{ToolCall, ToolRegistry};
use tess_core::{Dossier, Outcome};
use tracing::{info, warn};

pub struct ToolCallEngine {
    tools: Arc<ToolRegistry>,
    event_bus: Arc<EventBus>,
    parallel: bool,
}

impl ToolCallEngine {
    pub fn new(tools: Arc<ToolRegistry>, event_bus: Arc<EventBus>) -> Self {
        Self {
            tools,
            event_bus,
            parallel: true,
        }
    }

    /// Run a batch concurrently (default) or one call at a time.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Execute `calls` against `dossier`, apply every patch in request
    /// order, and transcribe the direct messages of successful outcomes.
    ///
    /// A failing or panicking call yields a failure outcome and never stops
    /// its siblings. The returned outcomes are in request order.
    pub async fn run(&self, dossier: &mut Dossier, calls: &[ToolCall]) -> Vec<Outcome> {
        let outcomes = {
            let snapshot: &Dossier = dossier;
            if self.parallel {
                join_all(calls.iter().map(|call| self.execute_one(snapshot, call))).await
            } else {
                let mut outcomes = Vec::with_capacity(calls.len());
                for call in calls {
                    outcomes.push(self.execute_one(snapshot, call).await);
                }
                outcomes
            }
        };

        for outcome in &outcomes {
            let Some(patch) = &outcome.patch else {
                continue;
            };
            patch.apply(dossier);
            info!(
                dossier_id = %dossier.id,
                tool = %outcome.tool,
                add_leg = patch.add_legislation.len(),
                add_case = patch.add_case_law.len(),
                select = patch.select_titles.len(),
                unselect = patch.unselect_titles.len(),
                "Applied patch"
            );
            self.event_bus.publish(DomainEvent::PatchApplied {
                dossier_id: dossier.id.to_string(),
                tool_name: outcome.tool.clone(),
                added: patch.add_legislation.len() + patch.add_case_law.len(),
                selected: patch.select_titles.len(),
                unselected: patch.unselect_titles.len(),
                timestamp: Utc::now(),
            });
        }

        for outcome in &outcomes {
            if let Some(message) = outcome.direct_message() {
                dossier.push_assistant(message);
            }
        }

        outcomes
    }

    async fn execute_one(&self, dossier: &Dossier, call: &ToolCall) -> Outcome {
        let start = Instant::now();
        let result = AssertUnwindSafe(self.tools.execute(dossier, call))
            .catch_unwind()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Tool call failed");
                Outcome::from_error(&e)
            }
            Err(panic) => {
                let reason = panic_reason(panic.as_ref());
                warn!(tool = %call.name, call_id = %call.id, reason = %reason, "Tool panicked");
                Outcome::from_error(&ToolError::ExecutionFailed {
                    tool_name: call.name.clone(),
                    reason,
                })
            }
        }
        .for_call(&call.name, &call.id);

        info!(
            dossier_id = %dossier.id,
            tool = %call.name,
            success = outcome.success,
            duration_ms,
            "Executed tool call"
        );
        self.event_bus.publish(DomainEvent::ToolExecuted {
            dossier_id: dossier.id.to_string(),
            tool_name: call.name.clone(),
            success: outcome.success,
            duration_ms,
            timestamp: Utc::now(),
        });
        outcome
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "tool panicked".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tess_core::tool::{Tool, string_parameter_schema};
    use tess_core::{Document, Patch};

    /// Adds and selects a document titled after its `query`.
    struct AddTool {
        delay_ms: u64,
    }

    #[async_trait]
    impl Tool for AddTool {
        fn name(&self) -> &str {
            "add"
        }
        fn description(&self) -> &str {
            "add a document"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            string_parameter_schema("query", "title")
        }
        async fn execute(
            &self,
            _dossier: &Dossier,
            arguments: serde_json::Value,
        ) -> Result<Outcome, ToolError> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            let title = arguments["query"].as_str().unwrap_or_default().to_string();
            Ok(Outcome::patched(Patch::add_and_select_legislation(vec![
                Document::new(title, "inhoud"),
            ])))
        }
    }

    struct UnselectTool;

    #[async_trait]
    impl Tool for UnselectTool {
        fn name(&self) -> &str {
            "unselect"
        }
        fn description(&self) -> &str {
            "unselect a title"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            string_parameter_schema("query", "title")
        }
        async fn execute(
            &self,
            _dossier: &Dossier,
            arguments: serde_json::Value,
        ) -> Result<Outcome, ToolError> {
            let title = arguments["query"].as_str().unwrap_or_default().to_string();
            Ok(Outcome::patched(Patch::unselect(vec![title])))
        }
    }

    struct SayTool;

    #[async_trait]
    impl Tool for SayTool {
        fn name(&self) -> &str {
            "say"
        }
        fn description(&self) -> &str {
            "reply directly"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            string_parameter_schema("query", "text")
        }
        async fn execute(
            &self,
            _dossier: &Dossier,
            arguments: serde_json::Value,
        ) -> Result<Outcome, ToolError> {
            Ok(Outcome::message(arguments["query"].as_str().unwrap_or_default()))
        }
    }

    struct PanicTool;

    #[async_trait]
    impl Tool for PanicTool {
        fn name(&self) -> &str {
            "boom"
        }
        fn description(&self) -> &str {
            "always panics"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            string_parameter_schema("query", "ignored")
        }
        async fn execute(&self, _: &Dossier, _: serde_json::Value) -> Result<Outcome, ToolError> {
            panic!("kapot");
        }
    }

    fn engine() -> ToolCallEngine {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(AddTool { delay_ms: 0 }));
        registry.register(Box::new(UnselectTool));
        registry.register(Box::new(SayTool));
        registry.register(Box::new(PanicTool));
        ToolCallEngine::new(Arc::new(registry), Arc::new(EventBus::default()))
    }

    fn call(id: &str, name: &str, query: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: serde_json::json!({ "query": query }).to_string(),
        }
    }

    #[tokio::test]
    async fn patches_apply_in_request_order() {
        let mut dossier = Dossier::new("dos-1");
        let calls = vec![call("1", "add", "A"), call("2", "unselect", "A")];
        engine().run(&mut dossier, &calls).await;
        assert!(dossier.selected_titles().is_empty());

        let mut dossier = Dossier::new("dos-2");
        let calls = vec![call("1", "unselect", "A"), call("2", "add", "A")];
        engine().run(&mut dossier, &calls).await;
        assert_eq!(dossier.selected_titles(), vec!["A"]);
    }

    #[tokio::test]
    async fn order_holds_when_later_call_finishes_first() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(AddTool { delay_ms: 30 }));
        registry.register(Box::new(UnselectTool));
        let engine = ToolCallEngine::new(Arc::new(registry), Arc::new(EventBus::default()));

        let mut dossier = Dossier::new("dos-1");
        let calls = vec![call("1", "add", "A"), call("2", "unselect", "A")];
        let outcomes = engine.run(&mut dossier, &calls).await;

        assert_eq!(outcomes[0].call_id, "1");
        assert_eq!(outcomes[1].call_id, "2");
        assert!(dossier.selected_titles().is_empty());
    }

    #[tokio::test]
    async fn failures_do_not_block_siblings() {
        let mut dossier = Dossier::new("dos-1");
        let calls = vec![
            call("1", "nope", "x"),
            ToolCall {
                id: "2".into(),
                name: "add".into(),
                arguments: "{broken".into(),
            },
            call("3", "boom", "x"),
            call("4", "add", "B"),
        ];
        let outcomes = engine().run(&mut dossier, &calls).await;

        assert_eq!(outcomes.len(), 4);
        assert!(!outcomes[0].success);
        assert!(outcomes[0].message.contains("Tool not found"));
        assert!(!outcomes[1].success);
        assert!(!outcomes[2].success);
        assert!(outcomes[2].message.contains("kapot"));
        assert!(outcomes[3].success);
        assert_eq!(outcomes[3].tool, "add");
        assert_eq!(dossier.selected_titles(), vec!["B"]);
        // Failure reasons are not transcribed
        assert!(dossier.conversation.is_empty());
    }

    #[tokio::test]
    async fn direct_messages_are_transcribed() {
        let mut dossier = Dossier::new("dos-1");
        let calls = vec![call("1", "say", "Het antwoord"), call("2", "say", "  ")];
        engine().run(&mut dossier, &calls).await;
        assert_eq!(dossier.conversation.len(), 1);
        assert_eq!(dossier.conversation[0].content, "Het antwoord");
    }

    #[tokio::test]
    async fn sequential_mode_matches_parallel() {
        let calls = vec![call("1", "add", "A"), call("2", "add", "B"), call("3", "unselect", "A")];
        let mut parallel = Dossier::new("dos-1");
        engine().run(&mut parallel, &calls).await;
        let mut sequential = Dossier::new("dos-1");
        engine().with_parallel(false).run(&mut sequential, &calls).await;
        assert_eq!(parallel, sequential);
    }

    #[tokio::test]
    async fn publishes_events() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(AddTool { delay_ms: 0 }));
        let engine = ToolCallEngine::new(Arc::new(registry), bus);

        let mut dossier = Dossier::new("dos-1");
        engine.run(&mut dossier, &[call("1", "add", "A")]).await;

        let first = rx.recv().await.unwrap();
        assert!(matches!(first.as_ref(), DomainEvent::ToolExecuted { success: true, .. }));
        let second = rx.recv().await.unwrap();
        assert!(matches!(second.as_ref(), DomainEvent::PatchApplied { added: 1, .. }));
    }
}
