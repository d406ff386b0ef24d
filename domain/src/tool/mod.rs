//! Tool domain module
//!
//! Defines the capabilities a model may ask the caller to execute during a
//! tool-call loop.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ String       │
//! │ (registry)   │    │ (request)    │    │ (result)     │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`]: fixed set of [`ToolDefinition`]s, validated on registration
//! - [`ToolDefinition`]: name, description and parameter schema of one tool
//! - [`ToolCall`]: a model-produced request naming a tool and its arguments
//! - [`ToolError`]: dispatcher failures (`NotFound`, `InvalidArguments`, `ExecutionFailed`)
//! - [`ToolValidator`]: pure argument validation against a definition
//!
//! Execution lives behind the application layer's `ToolDispatcherPort`;
//! this module performs no I/O.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolArguments, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolSpecError};
