//! Clock tool: get_current_time

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use genai_domain::tool::{
    entities::{ToolArguments, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

pub const GET_CURRENT_TIME: &str = "get_current_time";

/// Offsets beyond this are rejected (real zones span -12..+14).
const MAX_OFFSET_HOURS: f64 = 14.0;

pub fn get_current_time_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_CURRENT_TIME,
        "Get the current date and time. Returns an RFC 3339 timestamp.",
    )
    .with_parameter(
        ToolParameter::new(
            "utc_offset_hours",
            "Offset from UTC in hours, e.g. 9 for Tokyo or -5.5. Defaults to 0 (UTC).",
            false,
        )
        .with_type("number"),
    )
}

pub fn execute_get_current_time(args: &ToolArguments) -> Result<String, ToolError> {
    let offset_hours = args
        .get("utc_offset_hours")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    format_time(Utc::now(), offset_hours)
}

fn format_time(now: DateTime<Utc>, offset_hours: f64) -> Result<String, ToolError> {
    if !offset_hours.is_finite() || offset_hours.abs() > MAX_OFFSET_HOURS {
        return Err(ToolError::invalid_arguments(
            GET_CURRENT_TIME,
            format!("utc_offset_hours must be within ±{}, got {}", MAX_OFFSET_HOURS, offset_hours),
        ));
    }
    let seconds = (offset_hours * 3600.0).round() as i32;
    let offset = FixedOffset::east_opt(seconds).ok_or_else(|| {
        ToolError::invalid_arguments(GET_CURRENT_TIME, format!("invalid offset {}", offset_hours))
    })?;
    Ok(now
        .with_timezone(&offset)
        .to_rfc3339_opts(SecondsFormat::Secs, true))
}
