//! Conversation entities

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    /// Prompt submitted by the caller
    User { content: String },
    /// Tool execution requested by the model
    ToolRequest { call: ToolCall },
    /// Result of a tool execution fed back to the model
    ToolResult { tool_name: String, content: String },
    /// Final text answer produced by the model
    Model { content: String },
}

impl Turn {
    pub fn kind(&self) -> &'static str {
        match self {
            Turn::User { .. } => "user",
            Turn::ToolRequest { .. } => "tool_request",
            Turn::ToolResult { .. } => "tool_result",
            Turn::Model { .. } => "model",
        }
    }
}

/// An ordered, append-only conversation (Entity)
///
/// Turns can only be pushed; nothing is ever removed or reordered. The
/// conversation is never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::User {
            content: content.into(),
        });
    }

    pub fn push_tool_request(&mut self, call: ToolCall) {
        self.turns.push(Turn::ToolRequest { call });
    }

    pub fn push_tool_result(&mut self, tool_name: impl Into<String>, content: impl Into<String>) {
        self.turns.push(Turn::ToolResult {
            tool_name: tool_name.into(),
            content: content.into(),
        });
    }

    pub fn push_model(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::Model {
            content: content.into(),
        });
    }

    /// Number of tool requests recorded so far
    pub fn tool_request_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| matches!(t, Turn::ToolRequest { .. }))
            .count()
    }
}
