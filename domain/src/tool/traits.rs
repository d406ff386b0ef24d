//! Tool domain traits
//!
//! Pure validation of tool calls. Execution is an application-layer port.

use super::entities::{ToolCall, ToolDefinition, ToolParameter};
use super::value_objects::ToolError;

/// Validator for tool calls
///
/// Checks a call against its definition without any I/O.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
///
/// Rejects missing required parameters, unknown parameters, values whose
/// JSON type does not match the declared `param_type`, and values outside a
/// declared enumeration.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(ToolError::invalid_arguments(
                    &definition.name,
                    format!("Missing required parameter '{}'", param.name),
                ));
            }
        }

        for (arg_name, value) in &call.arguments {
            let Some(param) = definition.parameter(arg_name) else {
                return Err(ToolError::invalid_arguments(
                    &definition.name,
                    format!("Unknown parameter '{}'", arg_name),
                ));
            };
            check_type(param, value).map_err(|message| {
                ToolError::invalid_arguments(&definition.name, message)
            })?;
        }

        Ok(())
    }
}

fn check_type(param: &ToolParameter, value: &serde_json::Value) -> Result<(), String> {
    let matches = match param.param_type.as_str() {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64() || is_integral_float(value),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    };
    if !matches {
        return Err(format!(
            "Parameter '{}' expects {}, got {}",
            param.name,
            param.param_type,
            json_type_name(value)
        ));
    }

    if !param.enum_values.is_empty() {
        let Some(s) = value.as_str() else {
            return Err(format!("Parameter '{}' expects one of {:?}", param.name, param.enum_values));
        };
        if !param.enum_values.iter().any(|v| v == s) {
            return Err(format!(
                "Parameter '{}' must be one of {:?}, got '{}'",
                param.name, param.enum_values, s
            ));
        }
    }

    Ok(())
}

// Some backends encode every number as a float (e.g. `2.0`).
fn is_integral_float(value: &serde_json::Value) -> bool {
    value.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
