//! Application layer for genai-relay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CacheSettings, DEFAULT_SYSTEM_INSTRUCTION, ExecutionParams};
pub use ports::{
    cache_store::{CacheStore, CacheStoreError},
    content_cache::{ContentCachePort, PrimingRequest},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage},
    progress::{NoProgress, ProgressNotifier},
    tool_dispatcher::ToolDispatcherPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::prompt_with_cache::{
    CachedAnswer, PromptWithCacheError, PromptWithCacheInput, PromptWithCacheUseCase,
};
pub use use_cases::tool_loop::{ToolCallLoop, ToolLoopError, ToolLoopInput};
