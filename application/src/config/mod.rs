//! Application-level configuration.
//!
//! - [`ExecutionParams`]: tool-call loop control (turn limit, tool timeout)
//! - [`CacheSettings`]: how documents are primed on a cache miss

pub mod cache_settings;
pub mod execution_params;

pub use cache_settings::{CacheSettings, DEFAULT_SYSTEM_INSTRUCTION};
pub use execution_params::ExecutionParams;
