//! Document cache configuration from TOML (`[cache]` section)

use genai_application::config::{CacheSettings, DEFAULT_SYSTEM_INSTRUCTION};
use genai_domain::Model;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where cache entries are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStoreKind {
    /// Process lifetime only
    #[default]
    Memory,
    /// JSON file that survives restarts
    File,
}

/// Raw cache configuration from TOML
///
/// # Example
///
/// ```toml
/// [cache]
/// model = "gemini-1.5-pro-001"
/// ttl_minutes = 60
/// store = "file"          # "memory" or "file"
/// path = "~/.cache/genai-relay/cache.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Model the cached contexts are created for
    pub model: Model,
    /// System instruction stored with each primed context
    pub system_instruction: Option<String>,
    /// TTL requested from the backend
    pub ttl_minutes: Option<u64>,
    pub store: CacheStoreKind,
    /// File location for `store = "file"`
    pub path: Option<PathBuf>,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            model: Model::default_cache_model(),
            system_instruction: None,
            ttl_minutes: Some(60),
            store: CacheStoreKind::Memory,
            path: None,
        }
    }
}

impl FileCacheConfig {
    pub fn to_cache_settings(&self) -> CacheSettings {
        let instruction = self
            .system_instruction
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string());
        CacheSettings::default()
            .with_model(self.model.clone())
            .with_system_instruction(Some(instruction))
            .with_ttl(self.ttl_minutes.map(|m| Duration::from_secs(m * 60)))
    }

    /// File used by the file store: `path`, else the user cache directory.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            dirs::cache_dir().map(|d| d.join("genai-relay").join("cache.json"))
        })
    }
}
