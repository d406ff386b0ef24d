//! Agent configuration from TOML (`[agent]` section)

use genai_application::config::ExecutionParams;
use genai_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw tool-call loop configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// model = "gemini-1.5-pro"
/// max_tool_turns = 10
/// tool_timeout_seconds = 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Model driving the loop
    pub model: Model,
    /// Optional system prompt for the session
    pub system_prompt: Option<String>,
    /// Maximum tool dispatches per prompt
    pub max_tool_turns: usize,
    /// Per-dispatch timeout; absent means no limit
    pub tool_timeout_seconds: Option<u64>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            model: Model::default(),
            system_prompt: None,
            max_tool_turns: params.max_tool_turns,
            tool_timeout_seconds: params.tool_timeout.map(|d| d.as_secs()),
        }
    }
}

impl FileAgentConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_tool_turns(self.max_tool_turns)
            .with_tool_timeout(self.tool_timeout_seconds.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        let config = FileAgentConfig::default();
        assert_eq!(config.to_execution_params(), ExecutionParams::default());
    }

    #[test]
    fn test_to_execution_params() {
        let config = FileAgentConfig {
            max_tool_turns: 3,
            tool_timeout_seconds: None,
            ..Default::default()
        };
        let params = config.to_execution_params();
        assert_eq!(params.max_tool_turns, 3);
        assert!(params.tool_timeout.is_none());
    }
}
