//! Tool implementations for the tool-call loop
//!
//! - `builtin`: demo tools (`get_current_time`, `calculate`)
//! - [`ToolRegistry`]: validated dispatch over a fixed tool set
//! - [`JsonSchemaToolConverter`]: Gemini function declarations

pub mod builtin;

mod registry;
mod schema;

pub use registry::{ToolHandler, ToolRegistry};
pub use schema::JsonSchemaToolConverter;
