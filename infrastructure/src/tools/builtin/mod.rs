//! Built-in demo tools
//!
//! Each tool exposes a name constant, a `*_definition()` and an
//! `execute_*` function taking the raw argument map. Arguments are
//! validated by the registry before a handler runs.

pub mod calculator;
pub mod time;

pub use calculator::{CALCULATE, calculate_definition, execute_calculate};
pub use time::{GET_CURRENT_TIME, execute_get_current_time, get_current_time_definition};
