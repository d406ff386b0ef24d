//! Output formatter trait

use genai_application::CachedAnswer;
use genai_domain::Conversation;

/// Trait for formatting command results
pub trait OutputFormatter {
    /// Format the result of a tool-call loop run
    fn format_ask(&self, prompt: &str, answer: &str, conversation: &Conversation) -> String;

    /// Format an answer produced against a cached document set
    fn format_docs(&self, prompt: &str, answer: &CachedAnswer) -> String;
}
