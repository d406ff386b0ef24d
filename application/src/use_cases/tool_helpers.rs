//! Shared preview helpers for the use cases.

use genai_domain::tool::entities::ToolCall;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`operation`, `query`, `timezone`) first, then
/// falls back to the first scalar value, ordered by key.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["operation", "query", "timezone"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(*key) {
            return preview(s, 50);
        }
    }
    let mut names: Vec<&String> = call.arguments.keys().collect();
    names.sort();
    for name in names {
        match &call.arguments[name] {
            serde_json::Value::String(s) => return preview(s, 50),
            serde_json::Value::Number(n) => return n.to_string(),
            serde_json::Value::Bool(b) => return b.to_string(),
            _ => {}
        }
    }
    String::new()
}

/// At most `max_len` characters of `s`, ending in `…` when cut.
///
/// Used for prompts and tool output in logs and progress lines.
pub(crate) fn preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
