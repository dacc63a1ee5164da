//! Outcome: the full result of one tool execution.

use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::patch::Patch;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Name of the tool that produced this outcome
    #[serde(default)]
    pub tool: String,

    /// The model's call ID this outcome answers
    #[serde(default)]
    pub call_id: String,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Patch>,

    /// Direct user-facing text (e.g. a generated answer). On failure this
    /// carries the reason instead and is not shown as a direct message.
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    /// A successful outcome carrying a patch.
    pub fn patched(patch: Patch) -> Self {
        Self {
            success: true,
            patch: Some(patch),
            ..Self::default()
        }
    }

    /// A successful outcome carrying direct text and no patch.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            success: true,
            message: text.into(),
            ..Self::default()
        }
    }

    /// A failed outcome. No patch, reason in both `message` and `error`.
    pub fn failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            success: false,
            message: reason.clone(),
            error: Some(reason),
            ..Self::default()
        }
    }

    pub fn from_error(err: &ToolError) -> Self {
        Self::failure(err.to_string())
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Stamp the tool name and call ID.
    pub fn for_call(mut self, tool: impl Into<String>, call_id: impl Into<String>) -> Self {
        self.tool = tool.into();
        self.call_id = call_id.into();
        self
    }

    /// The text to show the user verbatim, if any.
    pub fn direct_message(&self) -> Option<&str> {
        if self.success && !self.message.trim().is_empty() {
            Some(&self.message)
        } else {
            None
        }
    }
}
