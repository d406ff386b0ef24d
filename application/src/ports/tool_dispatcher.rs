//! Tool Dispatcher port
//!
//! Defines how the tool-call loop executes the tools a model requests.

use async_trait::async_trait;
use genai_domain::tool::{
    entities::{ToolArguments, ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolError,
};

/// Port for tool dispatch
///
/// Implementations map a tool name to an executable unit over a fixed,
/// pre-registered set of tools. Unknown names must fail with
/// [`ToolError::NotFound`] and malformed arguments with
/// [`ToolError::InvalidArguments`]; the loop never handles these itself.
#[async_trait]
pub trait ToolDispatcherPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute the named tool with the given arguments
    async fn call_function(&self, name: &str, args: &ToolArguments) -> Result<String, ToolError>;

    /// Execute a tool call produced by the model
    async fn dispatch(&self, call: &ToolCall) -> Result<String, ToolError> {
        self.call_function(&call.tool_name, &call.arguments).await
    }
}
