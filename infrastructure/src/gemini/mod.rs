//! Gemini REST adapter
//!
//! Implements the model-backend ports against the Generative Language API:
//!
//! - [`GeminiLlmGateway`]: [`LlmGateway`](genai_application::LlmGateway) and
//!   [`ContentCachePort`](genai_application::ContentCachePort)
//! - [`GeminiSession`]: history-keeping session with native function calling
//! - [`GeminiClient`]: JSON-over-HTTP transport

mod client;
mod error;
mod gateway;
mod session;
pub mod types;

pub use client::{DEFAULT_BASE_URL, GeminiClient, GeminiConfig};
pub use error::GeminiError;
pub use gateway::{GeminiLlmGateway, cached_content_request};
pub use session::GeminiSession;
