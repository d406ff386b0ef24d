//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Conversion into the
//! application's settings types happens through the `to_*` helpers on each
//! section.

mod agent;
mod cache;
mod gemini;
mod logging;
mod output;

pub use agent::FileAgentConfig;
pub use cache::{CacheStoreKind, FileCacheConfig};
pub use gemini::{DEFAULT_API_KEY_ENV, FileGeminiConfig};
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("{field}: model name cannot be empty")]
    EmptyModelName { field: &'static str },

    #[error("{field} cannot be 0")]
    InvalidTimeout { field: &'static str },

    #[error("agent.max_tool_turns must be at least 1")]
    InvalidMaxToolTurns,

    #[error("cache.ttl_minutes cannot be 0")]
    InvalidTtl,

    #[error("gemini.api_key_env cannot be empty")]
    EmptyApiKeyEnv,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Gemini API access
    pub gemini: FileGeminiConfig,
    /// Tool-call loop settings
    pub agent: FileAgentConfig,
    /// Document cache settings
    pub cache: FileCacheConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.agent.model.as_str().trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName { field: "agent.model" });
        }
        if self.cache.model.as_str().trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName { field: "cache.model" });
        }
        if self.agent.max_tool_turns == 0 {
            return Err(ConfigValidationError::InvalidMaxToolTurns);
        }
        if self.agent.tool_timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout {
                field: "agent.tool_timeout_seconds",
            });
        }
        if self.gemini.timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout {
                field: "gemini.timeout_seconds",
            });
        }
        if self.cache.ttl_minutes == Some(0) {
            return Err(ConfigValidationError::InvalidTtl);
        }
        if self.gemini.api_key_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiKeyEnv);
        }
        Ok(())
    }
}
