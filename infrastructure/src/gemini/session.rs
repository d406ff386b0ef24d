//! Gemini LLM session implementation
//!
//! `generateContent` is stateless, so the session keeps the conversation
//! history locally and sends all of it on every call.

use super::client::GeminiClient;
use super::types::{self, Content, GenerateContentRequest, GenerationConfig, Part, Role};
use async_trait::async_trait;
use genai_application::ports::llm_gateway::{GatewayError, LlmSession, ToolResultMessage};
use genai_domain::{CachedContentHandle, LlmResponse, Model};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct GeminiSession {
    client: Arc<GeminiClient>,
    model: Model,
    system_prompt: Option<String>,
    /// Primed context this session runs against, if any
    cached_content: Option<CachedContentHandle>,
    /// Conversation history
    history: Mutex<Vec<Content>>,
    /// Tool declarations (set when send_with_tools is first called)
    tools: Mutex<Vec<types::Tool>>,
}

impl GeminiSession {
    pub fn new(client: Arc<GeminiClient>, model: Model, system_prompt: Option<String>) -> Self {
        Self {
            client,
            model,
            system_prompt,
            cached_content: None,
            history: Mutex::new(Vec::new()),
            tools: Mutex::new(Vec::new()),
        }
    }

    /// A session whose requests reference a primed cached context.
    ///
    /// System instruction and documents live in the cached context, so the
    /// request itself carries neither.
    pub fn cached(client: Arc<GeminiClient>, model: Model, handle: CachedContentHandle) -> Self {
        Self {
            cached_content: Some(handle),
            ..Self::new(client, model, None)
        }
    }

    pub fn cached_content(&self) -> Option<&CachedContentHandle> {
        self.cached_content.as_ref()
    }

    fn build_request(&self, contents: &[Content], tools: &[types::Tool]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: contents.to_vec(),
            system_instruction: match (&self.cached_content, &self.system_prompt) {
                (None, Some(prompt)) if !prompt.is_empty() => Some(Content::system(prompt.clone())),
                _ => None,
            },
            tools: tools.to_vec(),
            generation_config: self.client.temperature().map(|temperature| GenerationConfig {
                temperature: Some(temperature),
            }),
            cached_content: self
                .cached_content
                .as_ref()
                .map(|handle| handle.as_str().to_string()),
        }
    }

    /// Append a user turn, call the API and record the model's reply.
    async fn send_user_parts(&self, parts: Vec<Part>) -> Result<LlmResponse, GatewayError> {
        let tools = self.tools.lock().await.clone();
        let mut history = self.history.lock().await;
        history.push(Content::new(Role::User, parts));

        let request = self.build_request(&history, &tools);
        debug!(
            model = %self.model,
            turns = history.len(),
            tools = tools.len(),
            "Sending Gemini request"
        );

        let result = self.client.generate_content(&self.model, &request).await;
        let response = match result.and_then(types::convert_response) {
            Ok(response) => response,
            Err(e) => {
                // Keep the history consistent for a retry by the caller.
                history.pop();
                return Err(e.into());
            }
        };

        let (llm_response, model_content) = response;
        if !model_content.parts.is_empty() {
            history.push(model_content);
        }
        Ok(llm_response)
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let response = self.send_user_parts(vec![Part::text(content)]).await?;
        Ok(response.text_content())
    }

    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        *self.tools.lock().await = types::tools_from_declarations(tools);
        self.send_user_parts(vec![Part::text(content)]).await
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError> {
        let parts = results.iter().map(types::tool_result_part).collect();
        self.send_user_parts(parts).await
    }

    async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    async fn truncate_history(&self, len: usize) {
        let mut history = self.history.lock().await;
        if history.len() > len {
            debug!(from = history.len(), to = len, "Rolling back session history");
            history.truncate(len);
        }
    }
}
