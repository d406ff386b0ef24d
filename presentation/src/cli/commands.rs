//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Answer plus the tool-call transcript or cache details
    Full,
    /// Only the final answer
    Answer,
    /// JSON output
    Json,
}

impl From<OutputFormat> for genai_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => genai_domain::OutputFormat::Full,
            OutputFormat::Answer => genai_domain::OutputFormat::Answer,
            OutputFormat::Json => genai_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for genai-relay
#[derive(Parser, Debug)]
#[command(name = "genai-relay")]
#[command(author, version, about = "Gemini tool-calling agent and document-cache prompting")]
#[command(long_about = r#"
genai-relay drives Gemini models in two ways:

  ask   The model may call builtin tools (get_current_time, calculate)
        until it produces a final answer.
  docs  Documents are primed once into a cached context keyed by the set
        of document ids; later prompts on the same set reuse it.

Configuration is merged from (highest priority first):
1. GENAI_* environment variables (e.g. GENAI_AGENT__MAX_TOOL_TURNS=5)
2. --config <path>                         Explicit config file
3. ./genai-relay.toml                      Project-level config
4. ~/.config/genai-relay/config.toml       Global config

The API key is read from gemini.api_key or the GEMINI_API_KEY variable.

Example:
  genai-relay ask "What time is it in Tokyo?"
  genai-relay docs -d A1=paper1.pdf -d A2=paper2.pdf -p "Summarize both papers"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_default_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Append a JSONL transcript of the conversation to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub conversation_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a question; the model may call builtin tools before answering
    Ask(AskArgs),
    /// Ask questions about a set of documents through the context cache
    Docs(DocsArgs),
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    pub prompt: String,

    /// Model to use
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// System prompt for the session
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Maximum number of tool calls before giving up
    #[arg(long, value_name = "N")]
    pub max_tool_turns: Option<usize>,

    /// Timeout for each tool call in seconds
    #[arg(long, value_name = "SECS")]
    pub tool_timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DocsArgs {
    /// Prompt to run (repeat to run several concurrently on one cached context)
    #[arg(short, long = "prompt", value_name = "PROMPT", required = true)]
    pub prompts: Vec<String>,

    /// Document as PATH, ID=PATH or ID=URI (gs://, https://)
    #[arg(short, long = "doc", value_name = "DOC", required = true)]
    pub docs: Vec<String>,

    /// Model the cached context is created for
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Requested lifetime of a newly primed context
    #[arg(long, value_name = "MINUTES")]
    pub ttl_minutes: Option<u64>,

    /// Persist cache entries to this JSON file
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,
}
