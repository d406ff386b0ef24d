//! Gemini API configuration from TOML (`[gemini]` section)

use crate::gemini::{DEFAULT_BASE_URL, GeminiConfig, GeminiError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable consulted when no key is written in the file.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Raw Gemini configuration from TOML
///
/// # Example
///
/// ```toml
/// [gemini]
/// api_key_env = "GEMINI_API_KEY"   # read the key from this variable
/// timeout_seconds = 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// API key written inline. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Override of the REST endpoint root
    pub base_url: Option<String>,
    /// HTTP request timeout
    pub timeout_seconds: Option<u64>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: None,
            timeout_seconds: Some(120),
        }
    }
}

impl FileGeminiConfig {
    /// Resolve the API key from the file or the configured variable.
    pub fn resolve_api_key(&self) -> Result<String, GeminiError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GeminiError::MissingApiKey(self.api_key_env.clone()))
    }

    pub fn to_gemini_config(&self) -> Result<GeminiConfig, GeminiError> {
        let mut config = GeminiConfig::new(self.resolve_api_key()?);
        config.base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        config.timeout = self.timeout_seconds.map(Duration::from_secs);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_key_wins() {
        let config = FileGeminiConfig {
            api_key: Some("inline".to_string()),
            api_key_env: "GENAI_RELAY_TEST_UNSET_VARIABLE".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().unwrap(), "inline");
    }

    #[test]
    fn test_missing_key_names_variable() {
        let config = FileGeminiConfig {
            api_key_env: "GENAI_RELAY_TEST_UNSET_VARIABLE".to_string(),
            ..Default::default()
        };
        let err = config.to_gemini_config().unwrap_err();
        assert!(err.to_string().contains("GENAI_RELAY_TEST_UNSET_VARIABLE"));
    }

    #[test]
    fn test_key_from_environment() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("GENAI_RELAY_TEST_KEY", "from-env");
            let config = FileGeminiConfig {
                api_key_env: "GENAI_RELAY_TEST_KEY".to_string(),
                base_url: Some("http://localhost:8080/".to_string()),
                timeout_seconds: None,
                ..Default::default()
            };
            let gemini = config.to_gemini_config().unwrap();
            assert_eq!(gemini.api_key, "from-env");
            assert_eq!(gemini.base_url, "http://localhost:8080/");
            assert!(gemini.timeout.is_none());
            Ok(())
        });
    }
}
