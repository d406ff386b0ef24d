//! Progress reporting for tool-call loops and document priming

use colored::Colorize;
use genai_application::ProgressNotifier;
use genai_domain::{CacheKey, ToolCall, ToolError};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with an indicatif spinner on stderr
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Update the running spinner, starting one if needed
    fn set_status(&self, prefix: &str, message: String) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_prefix(prefix.to_string());
        pb.set_message(message);
    }

    /// Print a line above the spinner (or plainly when none is running)
    fn println(&self, line: String) {
        let spinner = self.spinner.lock().ok().and_then(|g| g.as_ref().cloned());
        match spinner {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }

    fn finish(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_model_request(&self, turn: usize) {
        let message = if turn == 0 {
            "Waiting for model...".to_string()
        } else {
            format!("Waiting for model (after {} tool call(s))...", turn)
        };
        self.set_status("Model", message);
    }

    fn on_tool_call(&self, call: &ToolCall) {
        self.set_status("Tool", format!("Running {}", call.tool_name));
    }

    fn on_tool_result(&self, tool_name: &str, duration_ms: u64, preview: &str) {
        self.println(format!(
            "  {} {} {} {}",
            "v".green(),
            tool_name.bold(),
            format!("({}ms)", duration_ms).dimmed(),
            preview
        ));
    }

    fn on_tool_error(&self, tool_name: &str, error: &ToolError) {
        self.println(format!("  {} {} {}", "x".red(), tool_name.bold(), error));
    }

    fn on_final_answer(&self, _answer: &str) {
        self.finish();
    }

    fn on_cache_lookup(&self, key: &CacheKey, hit: bool) {
        let status = if hit { "cache hit".green() } else { "primed".yellow() };
        self.println(format!("  {} [{}] {}", "*".cyan(), key, status));
    }

    fn on_priming_start(&self, key: &CacheKey, document_count: usize) {
        self.set_status(
            "Cache",
            format!("Priming {} document(s) for [{}]...", document_count, key),
        );
    }
}

/// Simple text-based progress (no spinner), for non-terminal stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_tool_call(&self, call: &ToolCall) {
        eprintln!("{} {}", "->".cyan(), call.tool_name.bold());
    }

    fn on_tool_result(&self, tool_name: &str, duration_ms: u64, _preview: &str) {
        eprintln!("  {} {} ({}ms)", "v".green(), tool_name, duration_ms);
    }

    fn on_tool_error(&self, tool_name: &str, error: &ToolError) {
        eprintln!("  {} {} {}", "x".red(), tool_name, error);
    }

    fn on_cache_lookup(&self, key: &CacheKey, hit: bool) {
        eprintln!(
            "{} [{}] {}",
            "->".cyan(),
            key,
            if hit { "cache hit" } else { "primed" }
        );
    }

    fn on_priming_start(&self, key: &CacheKey, document_count: usize) {
        eprintln!("{} priming {} document(s) for [{}]", "->".cyan(), document_count, key);
    }
}
