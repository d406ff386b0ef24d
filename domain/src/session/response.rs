//! Structured model responses.
//!
//! A model reply is a list of content blocks mixing text and tool-use
//! requests. [`LlmResponse::turn`] turns that list into an explicit
//! [`ModelTurn`] so the tool-call loop never infers completion from a
//! missing field.

use crate::tool::entities::{ToolArguments, ToolCall};
use serde::{Deserialize, Serialize};

/// A single block of content within a model response.
///
/// # Examples
///
/// ```
/// use genai_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text("Let me check the time.".to_string());
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "call_1".to_string(),
///     name: "get_current_time".to_string(),
///     input: Default::default(),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text(String),

    /// A tool use request from the model.
    ToolUse {
        /// Backend-assigned ID for correlating results (may be empty).
        id: String,
        /// Name of the requested tool.
        name: String,
        /// Loosely typed arguments.
        input: ToolArguments,
    },
}

impl ContentBlock {
    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &str, &ToolArguments)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// The model wants a tool executed.
    ToolUse,
    /// Hit the token limit; the response may be truncated.
    MaxTokens,
    /// Blocked by a safety filter.
    Safety,
    /// Provider-specific stop reason.
    Other(String),
}

/// Classified model reply.
///
/// This is the explicit discriminated status the tool-call loop dispatches
/// on.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// The leading content unit is a tool-use request.
    ToolCall(ToolCall),
    /// The leading content unit is text; carries the full text content.
    Final(String),
    /// The response has no usable content unit.
    Malformed(String),
}

/// A structured response from a model, supporting both text and tool use.
///
/// # Examples
///
/// ```
/// use genai_domain::session::response::{LlmResponse, ModelTurn};
///
/// let response = LlmResponse::from_text("4");
/// assert_eq!(response.turn(), ModelTurn::Final("4".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Create a response with a single tool-use block.
    pub fn from_tool_call(call: ToolCall) -> Self {
        Self {
            content: vec![ContentBlock::ToolUse {
                id: call.native_id.unwrap_or_default(),
                name: call.tool_name,
                input: call.arguments,
            }],
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        }
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all `ToolUse` content blocks as `Vec<ToolCall>`.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCall::from_native(id, name, input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    /// Classify the response by its leading content unit.
    ///
    /// - leading `ToolUse` → [`ModelTurn::ToolCall`]
    /// - leading `Text` → [`ModelTurn::Final`] with all text blocks joined
    /// - no content → [`ModelTurn::Malformed`]
    pub fn turn(&self) -> ModelTurn {
        match self.content.first() {
            Some(ContentBlock::ToolUse { id, name, input }) => {
                ModelTurn::ToolCall(ToolCall::from_native(id, name, input.clone()))
            }
            Some(ContentBlock::Text(_)) => ModelTurn::Final(self.text_content()),
            None => ModelTurn::Malformed(match &self.stop_reason {
                Some(reason) => format!("response has no content (stop reason: {:?})", reason),
                None => "response has no content".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tool_block(id: &str, name: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: [("operation".to_string(), serde_json::json!("add"))]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn from_text_creates_text_only_response() {
        let response = LlmResponse::from_text("Hello, world!");
        assert_eq!(response.text_content(), "Hello, world!");
        assert!(!response.has_tool_calls());
        assert!(response.tool_calls().is_empty());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.model, None);
    }

    #[test]
    fn tool_calls_extraction() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::Text("Computing.".to_string()),
                tool_block("call_1", "calculate"),
                ContentBlock::Text(" Checking time.".to_string()),
                tool_block("call_2", "get_current_time"),
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: Some("gemini-1.5-pro".to_string()),
        };

        assert!(response.has_tool_calls());
        assert_eq!(response.text_content(), "Computing. Checking time.");

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "calculate");
        assert_eq!(calls[0].native_id, Some("call_1".to_string()));
        assert_eq!(calls[0].get_string("operation"), Some("add"));
        assert_eq!(calls[1].tool_name, "get_current_time");
    }

    #[test]
    fn turn_leading_tool_use_is_tool_call() {
        let response = LlmResponse {
            content: vec![tool_block("", "calculate"), ContentBlock::Text("x".into())],
            stop_reason: None,
            model: None,
        };
        match response.turn() {
            ModelTurn::ToolCall(call) => {
                assert_eq!(call.tool_name, "calculate");
                assert!(call.native_id.is_none());
            }
            other => panic!("expected tool call, got {:?}", other),
        }
    }

    #[test]
    fn turn_leading_text_is_final() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::Text("The answer ".into()),
                ContentBlock::Text("is 4.".into()),
            ],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        };
        assert_eq!(response.turn(), ModelTurn::Final("The answer is 4.".to_string()));
    }

    #[test]
    fn turn_empty_response_is_malformed() {
        let response = LlmResponse {
            content: vec![],
            stop_reason: Some(StopReason::Safety),
            model: None,
        };
        match response.turn() {
            ModelTurn::Malformed(reason) => assert!(reason.contains("Safety")),
            other => panic!("expected malformed, got {:?}", other),
        }
    }

    #[test]
    fn from_tool_call_round_trips_through_turn() {
        let call = ToolCall::new("get_current_time");
        let response = LlmResponse::from_tool_call(call.clone());
        assert_eq!(response.turn(), ModelTurn::ToolCall(call));
    }

    #[test]
    fn content_block_accessors() {
        let text = ContentBlock::Text("hello".to_string());
        assert_eq!(text.as_text(), Some("hello"));
        assert!(text.as_tool_use().is_none());

        let tool = ContentBlock::ToolUse {
            id: "id1".to_string(),
            name: "calculate".to_string(),
            input: HashMap::new(),
        };
        assert!(tool.as_text().is_none());
        let (id, name, input) = tool.as_tool_use().unwrap();
        assert_eq!(id, "id1");
        assert_eq!(name, "calculate");
        assert!(input.is_empty());
    }
}
