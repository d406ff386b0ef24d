//! Gemini function-declaration converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the
//! `functionDeclarations` entries of a generateContent request.

use genai_application::ports::tool_schema::ToolSchemaPort;
use genai_domain::tool::entities::ToolDefinition;
use serde_json::{Map, Value, json};

/// Converts tool definitions to OpenAPI-style function declarations.
///
/// param_type → schema type:
/// - `"string"`, `"number"`, `"integer"`, `"boolean"`, `"object"`, `"array"` → same
/// - anything else → `"string"`
///
/// A tool without parameters omits the `parameters` key, which the API
/// requires for zero-argument functions.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        if tool.parameters.is_empty() {
            return json!({
                "name": tool.name,
                "description": tool.description,
            });
        }

        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                t @ ("string" | "number" | "integer" | "boolean" | "object" | "array") => t,
                _ => "string",
            };

            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(schema_type));
            prop.insert("description".to_string(), json!(param.description));
            if !param.enum_values.is_empty() {
                prop.insert("enum".to_string(), json!(param.enum_values));
            }
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
