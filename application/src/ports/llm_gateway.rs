//! LLM Gateway port
//!
//! Defines the interface for communicating with the model backend.

use async_trait::async_trait;
use genai_domain::{CachedContentHandle, LlmResponse, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A tool result sent back to the model after a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResultMessage {
    /// Backend-assigned ID of the originating tool call, if any.
    pub tool_use_id: Option<String>,
    /// Name of the tool that produced the output.
    pub tool_name: String,
    /// Opaque result payload.
    pub output: String,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer opens model sessions.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session with the specified model
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Create a session whose requests run against a primed cached context
    async fn create_cached_session(
        &self,
        model: &Model,
        handle: &CachedContentHandle,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
///
/// Sessions keep their own history; every `send*` call appends to it.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &Model;

    /// Send a message and get the text response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;

    /// Send a message with tool declarations and get a structured response.
    ///
    /// Default implementation calls `send()` and wraps the text, for
    /// backends without tool support.
    async fn send_with_tools(
        &self,
        content: &str,
        _tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        let text = self.send(content).await?;
        Ok(LlmResponse::from_text(text))
    }

    /// Send tool results back and get the next structured response.
    async fn send_tool_results(
        &self,
        _results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError> {
        Err(GatewayError::Unsupported("send_tool_results"))
    }

    /// Number of entries in the history sent with the next request.
    ///
    /// Sessions without local history report 0.
    async fn history_len(&self) -> usize {
        0
    }

    /// Drop history entries past `len`.
    ///
    /// Used to undo an incomplete exchange, e.g. a tool call that never got
    /// its result sent back.
    async fn truncate_history(&self, _len: usize) {}
}
