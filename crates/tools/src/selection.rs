//! Shared plumbing for the selection-editing tools.
//!
//! Both tools show the model an exact candidate list and ask for a subset
//! of it in structured mode. Whatever the model returns is intersected
//! with the candidates, so an invented or misspelled title never reaches
//! a patch.

use serde::Deserialize;
use tess_core::error::ToolError;
use tess_core::provider::{ResponseFormat, complete_structured};
use tracing::{debug, warn};

use crate::ModelClient;

/// The structured answer shape: `{"titles": [string]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DocumentTitles {
    #[serde(default)]
    pub titles: Vec<String>,
}

pub(crate) fn titles_format() -> ResponseFormat {
    ResponseFormat {
        name: "document_titles".into(),
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "titles": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["titles"],
            "additionalProperties": false
        }),
    }
}

/// Ask the model to pick titles from `candidates`.
///
/// Returns the accepted titles in the order the model gave them, trimmed,
/// de-duplicated, and restricted to the candidate list.
pub(crate) async fn choose_titles(
    client: &ModelClient,
    tool_name: &str,
    prompt: String,
    candidates: &[String],
) -> Result<Vec<String>, ToolError> {
    let request = client.request(prompt).with_response_format(titles_format());
    let answer: DocumentTitles = complete_structured(client.provider.as_ref(), request)
        .await
        .map_err(|e| ToolError::External {
            tool_name: tool_name.to_string(),
            reason: e.to_string(),
        })?;

    let mut accepted: Vec<String> = Vec::new();
    for title in &answer.titles {
        let title = title.trim();
        if !candidates.iter().any(|c| c == title) {
            warn!(tool = %tool_name, title = %title, "Model returned a title outside the candidate list");
            continue;
        }
        if !accepted.iter().any(|a| a == title) {
            accepted.push(title.to_string());
        }
    }
    debug!(tool = %tool_name, returned = answer.titles.len(), accepted = accepted.len(), "Titles chosen");
    Ok(accepted)
}
