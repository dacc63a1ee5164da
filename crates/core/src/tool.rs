//! Tool trait: the capability interface the model can invoke.
//!
//! A tool reads a [`Dossier`] and returns an [`Outcome`]. It never mutates
//! the dossier; any state change travels as the outcome's [`Patch`](crate::Patch)
//! and is applied later by the tool-call engine.
//!
//! Every tool today exposes the same parameter shape: an object with one
//! required string field (`query` or `instruction`).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dossier::Dossier;
use crate::error::ToolError;
use crate::outcome::Outcome;
use crate::provider::ToolDefinition;

/// A request to execute a tool, as chosen by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as the raw JSON string the model produced
    pub arguments: String,
}

/// The core Tool trait.
///
/// Domain failures (empty instruction, nothing to act on) are returned as
/// `Ok(Outcome::failure(..))`. `Err` is reserved for faults: bad arguments
/// or a failing external call. The engine turns both into failure outcomes.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "get_legislation").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool against a read-only dossier.
    async fn execute(
        &self,
        dossier: &Dossier,
        arguments: serde_json::Value,
    ) -> Result<Outcome, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Build the single-required-string parameter schema.
pub fn string_parameter_schema(field: &str, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            field: {
                "type": "string",
                "description": description
            }
        },
        "required": [field]
    })
}

/// Decode a validated argument object into a tool's typed arguments.
pub fn parse_arguments<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Check an argument payload against a tool's parameter schema.
///
/// The payload must be an object, every required field must be present and
/// a string, and fields the schema does not declare are rejected.
pub fn validate_arguments(
    schema: &serde_json::Value,
    arguments: &serde_json::Value,
) -> Result<(), ToolError> {
    let args = arguments
        .as_object()
        .ok_or_else(|| ToolError::InvalidArguments("arguments must be a JSON object".into()))?;
    let properties = schema["properties"].as_object();

    for key in args.keys() {
        if !properties.is_some_and(|p| p.contains_key(key)) {
            return Err(ToolError::InvalidArguments(format!("unknown field '{key}'")));
        }
    }

    for field in schema["required"].as_array().into_iter().flatten() {
        let Some(field) = field.as_str() else {
            continue;
        };
        match args.get(field) {
            None => {
                return Err(ToolError::InvalidArguments(format!(
                    "missing required field '{field}'"
                )));
            }
            Some(value) if !value.is_string() => {
                return Err(ToolError::InvalidArguments(format!(
                    "field '{field}' must be a string"
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// A registry of available tools, kept in registration order.
///
/// The engine uses this to:
/// 1. Get tool definitions to send to the LLM (stable order)
/// 2. Resolve a tool by name when the LLM requests it
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            warn!(tool = %tool.name(), "Tool already registered, replacing");
            *slot = tool;
            return;
        }
        info!(tool = %tool.name(), "Registered tool");
        self.tools.push(tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate every registered tool. Returns one line per problem.
    pub fn validate(&self) -> Result<(), ToolError> {
        let mut problems = Vec::new();
        for (index, tool) in self.tools.iter().enumerate() {
            let label = if tool.name().trim().is_empty() {
                format!("#{index}")
            } else {
                tool.name().to_string()
            };
            if tool.name().trim().is_empty() {
                problems.push(format!("{label}: name is empty"));
            }
            if tool.description().trim().is_empty() {
                problems.push(format!("{label}: description is empty"));
            }
            if let Err(reason) = check_schema_shape(&tool.parameters_schema()) {
                problems.push(format!("{label}: {reason}"));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ToolError::Registration(problems.join("; ")))
        }
    }

    /// Resolve, validate, and run one call.
    pub async fn execute(&self, dossier: &Dossier, call: &ToolCall) -> Result<Outcome, ToolError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        let raw = if call.arguments.trim().is_empty() {
            "{}"
        } else {
            call.arguments.as_str()
        };
        let arguments: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| ToolError::InvalidArguments(format!("malformed JSON: {e}")))?;
        validate_arguments(&tool.parameters_schema(), &arguments)?;
        tool.execute(dossier, arguments).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_schema_shape(schema: &serde_json::Value) -> Result<(), String> {
    if schema["type"] != "object" {
        return Err("schema type must be 'object'".into());
    }
    let properties = schema["properties"]
        .as_object()
        .ok_or("schema has no properties")?;
    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    if properties.len() != 1 || required.len() != 1 {
        return Err("schema must declare exactly one required field".into());
    }
    if properties
        .get(required[0])
        .is_none_or(|p| p["type"] != "string")
    {
        return Err(format!("required field '{}' must be a string property", required[0]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoArgs {
        text: String,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            string_parameter_schema("text", "Text to echo")
        }
        async fn execute(
            &self,
            _dossier: &Dossier,
            arguments: serde_json::Value,
        ) -> Result<Outcome, ToolError> {
            let args: EchoArgs = parse_arguments(arguments)?;
            Ok(Outcome::message(args.text))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            ""
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _: &Dossier, _: serde_json::Value) -> Result<Outcome, ToolError> {
            Ok(Outcome::default())
        }
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.definitions()[0].name, "echo");
    }

    #[test]
    fn registry_replaces_duplicates() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(EchoTool));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn validate_accepts_single_string_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(BrokenTool));
        let err = registry.validate().unwrap_err().to_string();
        assert!(err.contains("broken: description is empty"));
        assert!(err.contains("exactly one required field"));
    }

    #[test]
    fn validate_arguments_rules() {
        let schema = string_parameter_schema("query", "q");
        assert!(validate_arguments(&schema, &serde_json::json!({"query": "btw"})).is_ok());
        assert!(validate_arguments(&schema, &serde_json::json!({})).is_err());
        assert!(validate_arguments(&schema, &serde_json::json!({"query": 3})).is_err());
        assert!(validate_arguments(&schema, &serde_json::json!({"query": "a", "x": "b"})).is_err());
        assert!(validate_arguments(&schema, &serde_json::json!(["query"])).is_err());
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let dossier = Dossier::new("dos-1");

        let outcome = registry
            .execute(&dossier, &call("echo", r#"{"text": "hallo"}"#))
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message, "hallo");
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let dossier = Dossier::new("dos-1");
        let err = registry.execute(&dossier, &call("nope", "{}")).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn registry_execute_malformed_json() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let dossier = Dossier::new("dos-1");
        let err = registry
            .execute(&dossier, &call("echo", "{text: hallo"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
