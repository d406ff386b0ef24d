//! Log destinations from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of prompts, tool calls and answers
    pub conversation_log: Option<PathBuf>,
    /// Diagnostic log file (tracing output)
    pub log_file: Option<PathBuf>,
}
