//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod prompt_with_cache;
pub mod tool_loop;
pub(crate) mod tool_helpers;
