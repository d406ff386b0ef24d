//! CLI entrypoint for genai-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use futures::future::join_all;
use genai_application::{
    CacheStore, ConversationLogger, NoConversationLogger, NoProgress, ProgressNotifier,
    PromptWithCacheInput, PromptWithCacheUseCase, ToolCallLoop, ToolDispatcherPort, ToolLoopInput,
};
use genai_domain::Model;
use genai_infrastructure::{
    CacheStoreKind, ConfigLoader, FileConfig, GeminiLlmGateway, InMemoryCacheStore,
    JsonFileCacheStore, JsonSchemaToolConverter, JsonlConversationLogger, ToolRegistry, load_documents,
};
use genai_presentation::{
    AskArgs, Cli, Command, ConsoleFormatter, DocsArgs, OutputFormatter, ProgressReporter,
    SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.print_default_config {
        print!("{}", ConfigLoader::default_toml()?);
        return Ok(());
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate()?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let format = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    let formatter = ConsoleFormatter::new(format);

    let progress: Box<dyn ProgressNotifier> = if cli.quiet || !config.output.show_progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let conversation_logger: Arc<dyn ConversationLogger> = match cli
        .conversation_log
        .as_ref()
        .or(config.logging.conversation_log.as_ref())
    {
        Some(path) => Arc::new(
            JsonlConversationLogger::open(path)
                .with_context(|| format!("Failed to open conversation log {}", path.display()))?,
        ),
        None => Arc::new(NoConversationLogger),
    };

    let Some(command) = cli.command else {
        bail!("No command given. Try `genai-relay ask \"What time is it?\"` or --help.");
    };

    // === Dependency Injection ===
    let gateway = Arc::new(GeminiLlmGateway::new(&config.gemini.to_gemini_config()?)?);

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                token.cancel();
            }
        });
    }

    let app = App {
        config: &config,
        gateway,
        conversation_logger,
        progress: progress.as_ref(),
        formatter: &formatter,
        token,
    };

    match command {
        Command::Ask(args) => app.ask(args).await,
        Command::Docs(args) => app.docs(args).await,
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

struct App<'a> {
    config: &'a FileConfig,
    gateway: Arc<GeminiLlmGateway>,
    conversation_logger: Arc<dyn ConversationLogger>,
    progress: &'a dyn ProgressNotifier,
    formatter: &'a ConsoleFormatter,
    token: CancellationToken,
}

impl App<'_> {
    async fn ask(self, args: AskArgs) -> Result<()> {
        let model: Model = match args.model {
            Some(m) => m.parse()?,
            None => self.config.agent.model.clone(),
        };

        let mut execution = self.config.agent.to_execution_params();
        if let Some(max) = args.max_tool_turns {
            execution = execution.with_max_tool_turns(max);
        }
        if let Some(secs) = args.tool_timeout {
            execution = execution.with_tool_timeout(Some(Duration::from_secs(secs)));
        }

        let mut input = ToolLoopInput::new(model).with_execution(execution);
        if let Some(system) = args
            .system_prompt
            .or_else(|| self.config.agent.system_prompt.clone())
        {
            input = input.with_system_prompt(system);
        }

        let registry: Arc<dyn ToolDispatcherPort> = Arc::new(ToolRegistry::with_builtins()?);
        info!(tools = ?registry.available_tools(), "Starting ask");

        let mut tool_loop =
            ToolCallLoop::start(&*self.gateway, registry, &JsonSchemaToolConverter, input)
                .await?
                .with_conversation_logger(self.conversation_logger.clone())
                .with_cancellation(self.token.clone());

        let answer = tool_loop.run(&args.prompt, self.progress).await?;
        print!(
            "{}",
            self.formatter
                .format_ask(&args.prompt, &answer, tool_loop.conversation())
        );
        Ok(())
    }

    async fn docs(self, args: DocsArgs) -> Result<()> {
        let documents = load_documents(args.docs.as_slice()).await?;
        let doc_ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();

        let mut cache_config = self.config.cache.clone();
        if let Some(model) = &args.model {
            cache_config.model = model.parse()?;
        }
        if let Some(ttl) = args.ttl_minutes {
            cache_config.ttl_minutes = Some(ttl);
        }

        let store: Arc<dyn CacheStore> = match (args.cache_file, cache_config.store) {
            (Some(path), _) => Arc::new(JsonFileCacheStore::open(path).await?),
            (None, CacheStoreKind::File) => {
                let path = cache_config
                    .store_path()
                    .context("No cache directory available; set cache.path")?;
                Arc::new(JsonFileCacheStore::open(path).await?)
            }
            (None, CacheStoreKind::Memory) => Arc::new(InMemoryCacheStore::new()),
        };

        let use_case = PromptWithCacheUseCase::new(
            self.gateway.clone(),
            self.gateway.clone(),
            store,
            cache_config.to_cache_settings(),
        )
        .with_conversation_logger(self.conversation_logger.clone());

        info!(
            documents = doc_ids.len(),
            prompts = args.prompts.len(),
            "Starting docs"
        );

        let runs = args.prompts.iter().map(|prompt| {
            let input = PromptWithCacheInput::new(prompt.clone(), doc_ids.clone())
                .with_contents(documents.clone());
            use_case.execute(input, self.progress)
        });

        let results = tokio::select! {
            results = join_all(runs) => results,
            _ = self.token.cancelled() => bail!("Cancelled"),
        };

        let mut failures = 0;
        for (prompt, result) in args.prompts.iter().zip(results) {
            match result {
                Ok(answer) => print!("{}", self.formatter.format_docs(prompt, &answer)),
                Err(e) => {
                    failures += 1;
                    eprintln!("Error for prompt '{}': {}", prompt, e);
                }
            }
        }

        if failures > 0 {
            bail!("{} of {} prompt(s) failed", failures, args.prompts.len());
        }
        Ok(())
    }
}
