//! Error types for the TESS domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; tool-level errors never
//! travel past the tool-call engine, where they become failure outcomes.

use thiserror::Error;

/// The top-level error type for all TESS operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the language-model collaborator (external calls).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// Failures raised while resolving, decoding, or running a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NoCandidates(String),

    #[error("External call failed in {tool_name}: {reason}")]
    External { tool_name: String, reason: String },

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool registration: {0}")]
    Registration(String),
}

/// Failures reading or writing dossier snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Snapshot serialization failed for {dossier_id}: {reason}")]
    Serialization { dossier_id: String, reason: String },

    #[error("Invalid dossier id: {0:?}")]
    InvalidId(String),
}
