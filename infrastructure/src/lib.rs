//! Infrastructure layer for genai-relay
//!
//! Adapters implementing the application-layer ports:
//!
//! - [`gemini`]: REST gateway, sessions and context priming
//! - [`cache`]: in-memory and JSON-file cache stores
//! - [`tools`]: validated tool registry, builtin tools, schema conversion
//! - [`logging`]: JSONL conversation transcripts
//! - [`config`]: layered TOML/env configuration
//! - [`documents`]: loading `--doc` arguments into documents

pub mod cache;
pub mod config;
pub mod documents;
pub mod gemini;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use cache::{InMemoryCacheStore, JsonFileCacheStore};
pub use config::{
    CacheStoreKind, ConfigLoader, ConfigValidationError, FileAgentConfig, FileCacheConfig,
    FileConfig, FileGeminiConfig, FileLoggingConfig, FileOutputConfig, FileOutputFormat,
};
pub use documents::{DocumentLoadError, load_document, load_documents};
pub use gemini::{GeminiClient, GeminiConfig, GeminiError, GeminiLlmGateway, GeminiSession};
pub use logging::JsonlConversationLogger;
pub use tools::{JsonSchemaToolConverter, ToolHandler, ToolRegistry};
