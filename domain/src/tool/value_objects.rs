//! Tool domain value objects: error types
//!
//! [`ToolError`] is what a dispatcher returns when it cannot produce a
//! result. The tool-call loop propagates it to its caller unmodified.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised by a dispatcher while handling a [`ToolCall`](super::ToolCall).
///
/// | Variant | Code | Raised when |
/// |---------|------|-------------|
/// | `NotFound` | `NOT_FOUND` | The model named an unregistered tool |
/// | `InvalidArguments` | `INVALID_ARGUMENT` | Missing, unknown or mistyped argument |
/// | `ExecutionFailed` | `EXECUTION_FAILED` | The tool itself failed |
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Tool '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn execution_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Stable error code for logs and transcripts
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::NotFound { .. } => "NOT_FOUND",
            ToolError::InvalidArguments { .. } => "INVALID_ARGUMENT",
            ToolError::ExecutionFailed { .. } => "EXECUTION_FAILED",
        }
    }
}

/// Error raised while building a [`ToolSpec`](super::ToolSpec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolSpecError {
    #[error("Tool name cannot be empty")]
    EmptyName,

    #[error("Tool '{0}' is already registered")]
    DuplicateName(String),

    #[error("Tool '{tool}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { tool: String, parameter: String },
}
