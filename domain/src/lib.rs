//! Domain layer for genai-relay
//!
//! This crate contains the pure types shared by every other layer. It has no
//! dependencies on infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Tool-Call Loop
//!
//! A model is driven through repeated tool invocation until it answers:
//!
//! - [`ToolSpec`] / [`ToolDefinition`]: the fixed set of capabilities offered to the model
//! - [`ToolCall`]: a model's request to run one of them
//! - [`LlmResponse`] → [`ModelTurn`]: explicit classification of every model reply
//! - [`Conversation`]: append-only transcript owned by one loop
//! - [`ToolLoopState`]: `AwaitingModel → DispatchingTool → … → Done`
//!
//! ## Keyed Content Cache
//!
//! - [`CacheKey`]: order-independent set of document ids
//! - [`CacheEntry`] / [`CachedContentHandle`]: a primed model context

pub mod cache;
pub mod config;
pub mod core;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheKey, CachedContentHandle, Document, DocumentContent};
pub use config::OutputFormat;
pub use core::{
    error::{DomainError, validate_prompt},
    model::Model,
};
pub use session::{
    entities::{Conversation, Turn},
    response::{ContentBlock, LlmResponse, ModelTurn, StopReason},
    state::{ToolLoopEvent, ToolLoopState},
};
pub use tool::{
    entities::{ToolArguments, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolSpecError},
};
