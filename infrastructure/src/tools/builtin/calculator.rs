//! Arithmetic tool: calculate

use genai_domain::tool::{
    entities::{ToolArguments, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

pub const CALCULATE: &str = "calculate";

pub fn calculate_definition() -> ToolDefinition {
    ToolDefinition::new(
        CALCULATE,
        "Apply a basic arithmetic operation to two numbers and return the result.",
    )
    .with_parameter(
        ToolParameter::new("operation", "The operation to apply", true)
            .with_enum(["add", "subtract", "multiply", "divide"]),
    )
    .with_parameter(ToolParameter::new("a", "Left operand", true).with_type("number"))
    .with_parameter(ToolParameter::new("b", "Right operand", true).with_type("number"))
}

pub fn execute_calculate(args: &ToolArguments) -> Result<String, ToolError> {
    let operation = args
        .get("operation")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::invalid_arguments(CALCULATE, "'operation' must be a string"))?;
    let a = number(args, "a")?;
    let b = number(args, "b")?;

    let result = match operation {
        "add" => a + b,
        "subtract" => a - b,
        "multiply" => a * b,
        "divide" => {
            if b == 0.0 {
                return Err(ToolError::execution_failed(CALCULATE, "division by zero"));
            }
            a / b
        }
        other => {
            return Err(ToolError::invalid_arguments(
                CALCULATE,
                format!("unsupported operation '{}'", other),
            ));
        }
    };

    if !result.is_finite() {
        return Err(ToolError::execution_failed(CALCULATE, "result is not a finite number"));
    }
    Ok(format_number(result))
}

fn number(args: &ToolArguments, key: &str) -> Result<f64, ToolError> {
    args.get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ToolError::invalid_arguments(CALCULATE, format!("'{}' must be a number", key)))
}

// Integral results print without a trailing ".0".
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
