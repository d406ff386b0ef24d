//! Execution parameters: tool-call loop control.
//!
//! [`ExecutionParams`] groups the static parameters that bound the
//! [`ToolCallLoop`](crate::use_cases::tool_loop::ToolCallLoop).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tool-call loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum tool dispatches in a single `run`.
    pub max_tool_turns: usize,
    /// Timeout for each dispatcher call. `None` waits indefinitely.
    pub tool_timeout: Option<Duration>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_tool_turns: 10,
            tool_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_tool_turns(mut self, max: usize) -> Self {
        self.max_tool_turns = max;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }
}
