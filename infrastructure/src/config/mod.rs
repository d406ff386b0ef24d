//! Configuration file loading for genai-relay
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `GENAI_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./genai-relay.toml`
//! 4. Global: `$XDG_CONFIG_HOME/genai-relay/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    CacheStoreKind, ConfigValidationError, DEFAULT_API_KEY_ENV, FileAgentConfig, FileCacheConfig,
    FileConfig, FileGeminiConfig, FileLoggingConfig, FileOutputConfig, FileOutputFormat,
};
pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
