//! Error types for the MCP adapter.

use thiserror::Error;

/// Main error type for the adapter.
///
/// Bridge-side problems (network failures, non-2xx replies) are not errors at this level: they
/// are reported to the caller through [`crate::adapter::ToolResult::Failure`].
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The tool name is not registered (or not enabled) on this adapter.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not match the tool's input shape.
    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Configuration errors (invalid YAML, bad URL, empty tool list)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup errors (transport failed to start)
    #[error("Startup error: {0}")]
    Startup(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
