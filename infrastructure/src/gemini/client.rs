//! HTTP client for the Gemini REST API (Google AI Studio endpoint)

use super::error::{GeminiError, Result};
use super::types::{
    CachedContent, CreateCachedContentRequest, GenerateContentRequest, GenerateContentResponse,
};
use genai_domain::Model;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default base URL of the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Connection settings for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// Sampling temperature sent with every generate request
    pub temperature: Option<f32>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(120)),
            temperature: Some(0.0),
        }
    }
}

async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let description = response.text().await.ok();
        Err(GeminiError::BadResponse {
            code: status.as_u16(),
            description,
        })
    } else {
        Ok(response)
    }
}

/// Thin JSON-over-HTTP client; authentication via the `x-goog-api-key` header.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| GeminiError::InvalidApiKey)?;
        let headers =
            HeaderMap::from_iter([(HeaderName::from_static("x-goog-api-key"), api_key)]);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
            temperature: config.temperature,
        })
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn generate_content_url(&self, model: &Model) -> String {
        format!(
            "{}models/{}:generateContent",
            self.base_url,
            model.as_str().trim_start_matches("models/")
        )
    }

    pub fn cached_contents_url(&self) -> String {
        format!("{}cachedContents", self.base_url)
    }

    /// `POST models/{model}:generateContent`
    pub async fn generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        debug!(
            model = %model,
            contents = request.contents.len(),
            cached = request.cached_content.is_some(),
            "Calling generateContent"
        );
        self.post_json(self.generate_content_url(model), request).await
    }

    /// `POST cachedContents`
    pub async fn create_cached_content(
        &self,
        request: &CreateCachedContentRequest,
    ) -> Result<CachedContent> {
        debug!(
            model = %request.model,
            contents = request.contents.len(),
            ttl = ?request.ttl,
            "Creating cached content"
        );
        self.post_json(self.cached_contents_url(), request).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T> {
        let response = self.http_client.post(url).json(body).send().await?;
        let response = check_response(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GeminiError::Decode(e.to_string()))
    }
}
