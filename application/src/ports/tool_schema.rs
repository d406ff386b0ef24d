//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to declare them to the
//! model API" (infrastructure).

use genai_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to the model API's declaration format.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a function declaration.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to declarations (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        spec.all().map(|t| self.tool_to_schema(t)).collect()
    }
}
