//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use genai_application::CachedAnswer;
use genai_domain::{Conversation, OutputFormat, ToolCall, Turn};

/// Formats answers for console display in the configured [`OutputFormat`]
pub struct ConsoleFormatter {
    format: OutputFormat,
}

impl ConsoleFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Full transcript: every turn, then the answer
    pub fn format_transcript(prompt: &str, answer: &str, conversation: &Conversation) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("genai-relay"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Prompt:".cyan().bold(), prompt));

        let tool_turns: Vec<&Turn> = conversation
            .turns()
            .iter()
            .filter(|t| matches!(t, Turn::ToolRequest { .. } | Turn::ToolResult { .. }))
            .collect();

        if !tool_turns.is_empty() {
            output.push_str(&Self::section_header("Tool Calls"));
            for turn in tool_turns {
                match turn {
                    Turn::ToolRequest { call } => {
                        output.push_str(&format!("  {} {}\n", "->".yellow(), Self::call_signature(call)));
                    }
                    Turn::ToolResult { content, .. } => {
                        output.push_str(&format!(
                            "  {} {}\n",
                            "<-".green(),
                            Self::indent(content, "     ").trim_start()
                        ));
                    }
                    _ => {}
                }
            }
        }

        output.push_str(&Self::section_header("Answer"));
        output.push_str(answer);
        output.push('\n');
        output.push_str(&Self::footer());
        output
    }

    /// Cache details, then the answer
    pub fn format_cached(prompt: &str, answer: &CachedAnswer) -> String {
        let ids: Vec<&str> = answer.key.ids().collect();
        let status = if answer.cache_hit {
            "hit".green()
        } else {
            "primed".yellow()
        };

        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "Prompt:".cyan().bold(), prompt));
        output.push_str(&format!("{} {}\n", "Documents:".cyan().bold(), ids.join(", ")));
        output.push_str(&format!(
            "{} {} ({})\n\n",
            "Cache:".cyan().bold(),
            status,
            answer.handle.as_str().dimmed()
        ));
        output.push_str(&answer.answer);
        output.push('\n');
        output
    }

    pub fn format_ask_json(prompt: &str, answer: &str, conversation: &Conversation) -> String {
        let value = serde_json::json!({
            "prompt": prompt,
            "answer": answer,
            "turns": conversation.turns(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_docs_json(prompt: &str, answer: &CachedAnswer) -> String {
        let value = serde_json::json!({
            "prompt": prompt,
            "answer": answer.answer,
            "documents": answer.key.ids().collect::<Vec<_>>(),
            "cached_content": answer.handle.as_str(),
            "cache_hit": answer.cache_hit,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn call_signature(call: &ToolCall) -> String {
        let mut args: Vec<(&String, &serde_json::Value)> = call.arguments.iter().collect();
        args.sort_by_key(|(k, _)| *k);
        let args = args
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", call.tool_name.bold(), args)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_ask(&self, prompt: &str, answer: &str, conversation: &Conversation) -> String {
        match self.format {
            OutputFormat::Answer => format!("{}\n", answer),
            OutputFormat::Full => Self::format_transcript(prompt, answer, conversation),
            OutputFormat::Json => Self::format_ask_json(prompt, answer, conversation),
        }
    }

    fn format_docs(&self, prompt: &str, answer: &CachedAnswer) -> String {
        match self.format {
            OutputFormat::Answer => format!("{}\n", answer.answer),
            OutputFormat::Full => Self::format_cached(prompt, answer),
            OutputFormat::Json => Self::format_docs_json(prompt, answer),
        }
    }
}
