//! Tool domain entities

use super::value_objects::ToolSpecError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Loosely typed argument mapping produced by the model
/// (string / number / bool / nested mapping values).
pub type ToolArguments = HashMap<String, serde_json::Value>;

/// Definition of a tool the model may request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_current_time")
    pub name: String,
    /// Free-text description the model uses for tool selection
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// JSON type hint: "string", "number", "integer", "boolean" or "object"
    pub param_type: String,
    /// Allowed values, if the parameter is an enumeration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            enum_values: Vec::new(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// The fixed set of tools available to one agent.
///
/// Names are unique; registration fails on duplicates instead of
/// overwriting. Iteration order is by name.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool (builder pattern)
    pub fn register(mut self, tool: ToolDefinition) -> Result<Self, ToolSpecError> {
        self.try_register(tool)?;
        Ok(self)
    }

    /// Register a tool in place
    pub fn try_register(&mut self, tool: ToolDefinition) -> Result<(), ToolSpecError> {
        if tool.name.trim().is_empty() {
            return Err(ToolSpecError::EmptyName);
        }
        if self.tools.contains_key(&tool.name) {
            return Err(ToolSpecError::DuplicateName(tool.name));
        }
        let mut seen = std::collections::HashSet::new();
        for param in &tool.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(ToolSpecError::DuplicateParameter {
                    tool: tool.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }
        self.tools.insert(tool.name.clone(), tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A model's request to execute a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: ToolArguments,
    /// Backend-assigned ID used to correlate the result, if the API provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            native_id: None,
        }
    }

    /// Build a call from a structured tool-use block of a model response
    pub fn from_native(id: &str, name: &str, input: ToolArguments) -> Self {
        Self {
            tool_name: name.to_string(),
            arguments: input,
            native_id: if id.is_empty() {
                None
            } else {
                Some(id.to_string())
            },
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a numeric argument (integers are widened)
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.arguments.get(key).and_then(|v| v.as_f64())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_tool() -> ToolDefinition {
        ToolDefinition::new("get_current_time", "Current time in a timezone").with_parameter(
            ToolParameter::new("utc_offset_hours", "Offset from UTC", false).with_type("number"),
        )
    }

    #[test]
    fn test_tool_definition() {
        let tool = time_tool();
        assert_eq!(tool.name, "get_current_time");
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameter("utc_offset_hours").unwrap().param_type, "number");
        assert!(tool.parameter("missing").is_none());
    }

    #[test]
    fn test_tool_spec_register() {
        let spec = ToolSpec::new()
            .register(time_tool())
            .unwrap()
            .register(ToolDefinition::new("calculate", "Arithmetic"))
            .unwrap();

        assert!(spec.get("get_current_time").is_some());
        assert!(spec.contains("calculate"));
        assert!(spec.get("unknown").is_none());
        assert_eq!(spec.len(), 2);
        assert_eq!(
            spec.names().collect::<Vec<_>>(),
            vec!["calculate", "get_current_time"]
        );
    }

    #[test]
    fn test_tool_spec_rejects_duplicates() {
        let err = ToolSpec::new()
            .register(time_tool())
            .unwrap()
            .register(time_tool())
            .unwrap_err();
        assert_eq!(err, ToolSpecError::DuplicateName("get_current_time".to_string()));
    }

    #[test]
    fn test_tool_spec_rejects_empty_name() {
        let err = ToolSpec::new()
            .register(ToolDefinition::new("  ", "blank"))
            .unwrap_err();
        assert_eq!(err, ToolSpecError::EmptyName);
    }

    #[test]
    fn test_tool_spec_rejects_duplicate_parameter() {
        let tool = ToolDefinition::new("calc", "c")
            .with_parameter(ToolParameter::new("a", "first", true))
            .with_parameter(ToolParameter::new("a", "again", true));
        let err = ToolSpec::new().register(tool).unwrap_err();
        assert!(matches!(err, ToolSpecError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("calculate")
            .with_arg("operation", "add")
            .with_arg("a", 2)
            .with_arg("b", 2.5);

        assert_eq!(call.tool_name, "calculate");
        assert_eq!(call.get_string("operation"), Some("add"));
        assert_eq!(call.get_f64("a"), Some(2.0));
        assert_eq!(call.get_f64("b"), Some(2.5));
        assert_eq!(call.get_bool("a"), None);
        assert!(call.native_id.is_none());
    }

    #[test]
    fn test_from_native_empty_id() {
        let call = ToolCall::from_native("", "calculate", HashMap::new());
        assert!(call.native_id.is_none());
        let call = ToolCall::from_native("call_1", "calculate", HashMap::new());
        assert_eq!(call.native_id.as_deref(), Some("call_1"));
    }
}
