//! Gemini gateway: implements [`LlmGateway`] and [`ContentCachePort`]
//! over one shared [`GeminiClient`].

use super::client::{GeminiClient, GeminiConfig};
use super::error::GeminiError;
use super::session::GeminiSession;
use super::types::{self, Content, CreateCachedContentRequest, Role};
use async_trait::async_trait;
use genai_application::ports::content_cache::{ContentCachePort, PrimingRequest};
use genai_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use genai_domain::{CachedContentHandle, Model};
use std::sync::Arc;
use tracing::info;

pub struct GeminiLlmGateway {
    client: Arc<GeminiClient>,
}

impl GeminiLlmGateway {
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        Ok(Self::with_client(Arc::new(GeminiClient::new(config)?)))
    }

    pub fn with_client(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<GeminiClient> {
        &self.client
    }
}

/// Build the `cachedContents` body for a priming request.
///
/// All documents go into a single user content entry.
pub fn cached_content_request(request: &PrimingRequest<'_>) -> CreateCachedContentRequest {
    let parts = request.documents.iter().map(types::document_part).collect();
    CreateCachedContentRequest {
        model: types::model_path(request.model),
        display_name: request.display_name.clone(),
        contents: vec![Content::new(Role::User, parts)],
        system_instruction: request.system_instruction.map(Content::system),
        ttl: request.ttl.map(types::ttl_string),
    }
}

#[async_trait]
impl LlmGateway for GeminiLlmGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession::new(
            self.client.clone(),
            model.clone(),
            None,
        )))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession::new(
            self.client.clone(),
            model.clone(),
            Some(system_prompt.to_string()),
        )))
    }

    async fn create_cached_session(
        &self,
        model: &Model,
        handle: &CachedContentHandle,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession::cached(
            self.client.clone(),
            model.clone(),
            handle.clone(),
        )))
    }
}

#[async_trait]
impl ContentCachePort for GeminiLlmGateway {
    async fn create_cached_content(
        &self,
        request: PrimingRequest<'_>,
    ) -> Result<CachedContentHandle, GatewayError> {
        let body = cached_content_request(&request);
        let cached = self.client.create_cached_content(&body).await?;
        info!(
            name = %cached.name,
            expire_time = cached.expire_time.as_deref().unwrap_or("-"),
            "Cached content created"
        );
        Ok(CachedContentHandle::new(cached.name))
    }
}
