//! Content cache port: the expensive priming operation.

use crate::ports::llm_gateway::GatewayError;
use async_trait::async_trait;
use genai_domain::{CachedContentHandle, Document, Model};
use std::time::Duration;

/// Everything needed to prime a model context with documents.
#[derive(Debug, Clone)]
pub struct PrimingRequest<'a> {
    pub model: &'a Model,
    pub system_instruction: Option<&'a str>,
    pub documents: &'a [Document],
    pub ttl: Option<Duration>,
    pub display_name: Option<String>,
}

/// Port for creating primed (cached) model contexts.
///
/// A successful call returns a handle that later sessions can be opened
/// against; see [`LlmGateway::create_cached_session`](crate::ports::llm_gateway::LlmGateway::create_cached_session).
#[async_trait]
pub trait ContentCachePort: Send + Sync {
    async fn create_cached_content(
        &self,
        request: PrimingRequest<'_>,
    ) -> Result<CachedContentHandle, GatewayError>;
}
