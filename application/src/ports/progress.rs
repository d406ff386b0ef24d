//! Progress notification port
//!
//! Output port the presentation layer implements to show what the tool-call
//! loop and the document cache are doing. All methods default to no-ops.

use genai_domain::{CacheKey, ToolCall, ToolError};

/// Callbacks for tool-call loop and document cache progress
pub trait ProgressNotifier: Send + Sync {
    /// Called before each request to the model (`turn` 0 is the prompt itself)
    fn on_model_request(&self, _turn: usize) {}

    /// Called when the model requests a tool
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called when a tool returned a result
    fn on_tool_result(&self, _tool_name: &str, _duration_ms: u64, _preview: &str) {}

    /// Called when a tool failed; the error is about to be propagated
    fn on_tool_error(&self, _tool_name: &str, _error: &ToolError) {}

    /// Called when the model produced its final answer
    fn on_final_answer(&self, _answer: &str) {}

    /// Called after resolving a document set in the cache
    fn on_cache_lookup(&self, _key: &CacheKey, _hit: bool) {}

    /// Called when priming starts for a document set
    fn on_priming_start(&self, _key: &CacheKey, _document_count: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {}
