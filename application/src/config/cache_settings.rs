//! Priming settings for the document cache.

use genai_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// System instruction attached to primed document contexts unless overridden.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an expert researcher. You always stick to the facts in the sources provided, and never make up new facts.\nNow look at these documents papers, and answer the following questions.";

/// How a document set is primed on a cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Model the cached context is created for.
    pub model: Model,
    /// System instruction stored with the cached context.
    pub system_instruction: Option<String>,
    /// TTL requested from the backend. Recorded on the entry, never enforced locally.
    pub ttl: Option<Duration>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            model: Model::default_cache_model(),
            system_instruction: Some(DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            ttl: Some(Duration::from_secs(60 * 60)),
        }
    }
}

impl CacheSettings {
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let settings = CacheSettings::default();
        assert_eq!(settings.model, Model::Gemini15Pro001);
        assert_eq!(settings.ttl, Some(Duration::from_secs(3600)));
        assert!(
            settings
                .system_instruction
                .as_deref()
                .is_some_and(|s| s.contains("expert researcher"))
        );
    }
}
