//! CLI entrypoint for termagent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use termagent_application::{
    AgentSession, AutoDenyConfirmation, ConfirmationPort, RunTurnUseCase, ToolDispatcher,
};
use termagent_domain::{Conversation, RiskPolicy, system_prompt};
use termagent_infrastructure::{
    AgentConfig, ConfigLoader, LocalToolExecutor, OllamaLlmGateway, OllamaSettings,
    OllamaToolSchema,
};
use termagent_presentation::{AgentRepl, Cli, InteractiveConfirmation, ReplConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Set to force debug logging and detailed turn errors
const DEBUG_ENV: &str = "AGENT_DEBUG";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let debug = std::env::var_os(DEBUG_ENV).is_some();

    init_logging(cli.verbose, debug);

    if cli.show_config {
        print_config_sources(&cli);
        let config = load_config(&cli)?;
        print_effective_config(&config);
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    config.validate().context("Invalid configuration")?;
    let model = config.parsed_model().context("Invalid model name")?;

    let Some(api_key) = config.api_key() else {
        bail!(
            "{} is not set. Export your Ollama API key, e.g.\n  export {}=...",
            config.api_key_env,
            config.api_key_env
        );
    };

    info!("Starting termagent (model: {})", model);

    // === Dependency Injection ===
    let gateway = Arc::new(
        OllamaLlmGateway::new(OllamaSettings {
            host: config.api_host.clone(),
            api_key: Some(api_key),
            request_timeout: config.request_timeout(),
        })
        .context("Failed to create HTTP client")?,
    );

    let executor =
        Arc::new(LocalToolExecutor::new().with_command_timeout(config.command_timeout()));
    let dispatcher = ToolDispatcher::new(executor);

    let confirmation: Arc<dyn ConfirmationPort> = if std::io::stdin().is_terminal() {
        Arc::new(InteractiveConfirmation::new())
    } else {
        warn!("stdin is not a terminal: calls that need confirmation will be denied");
        Arc::new(AutoDenyConfirmation)
    };

    let use_case = RunTurnUseCase::new(
        gateway,
        dispatcher,
        Arc::new(OllamaToolSchema),
        confirmation,
    )
    .with_params(config.execution_params());

    let session = AgentSession::new(
        Conversation::new(
            system_prompt(config.system_prompt.as_deref()),
            config.max_history,
        ),
        RiskPolicy::new(config.auto_approve),
        model,
    );

    let mut repl = AgentRepl::new(use_case, session).with_config(ReplConfig {
        show_progress: !cli.quiet,
        history_file: None,
        debug,
    });

    match cli.prompt.as_deref() {
        Some(prompt) => match repl.run_once(prompt).await {
            Ok(_) => Ok(ExitCode::SUCCESS),
            Err(_) => Ok(ExitCode::FAILURE),
        },
        None => {
            repl.run().await.context("Interactive session failed")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8, debug: bool) {
    let level = match (verbose, debug) {
        (0, false) => "warn",
        (1, false) => "info",
        (0..=2, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Files, then environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<AgentConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_without_files().context("Failed to read AGENT_* environment")?
    } else {
        if let Some(path) = &cli.config {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
        }
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if cli.yolo {
        config.auto_approve = true;
    }
    Ok(config)
}

fn print_config_sources(cli: &Cli) {
    println!("Configuration sources (in priority order):");
    println!("  [FLAGS] CLI:      --model, --yolo");
    for source in ConfigLoader::sources(cli.config.as_deref(), cli.no_config) {
        let mark = if source.found { "FOUND" } else { "     " };
        println!("  [{}] {:<9} {}", mark, format!("{}:", source.label), source.location);
    }
    println!();
}

fn print_effective_config(config: &AgentConfig) {
    println!("Effective configuration:");
    println!("  model               = {}", config.model);
    println!("  api_host            = {}", config.api_host);
    println!(
        "  api_key_env         = {} ({})",
        config.api_key_env,
        if config.api_key().is_some() { "set" } else { "not set" }
    );
    println!("  max_history         = {}", config.max_history);
    println!("  command_timeout     = {}s", config.command_timeout);
    println!("  max_output_chars    = {}", config.max_output_chars);
    println!("  max_tool_iterations = {}", config.max_tool_iterations);
    println!("  request_timeout     = {}s", config.request_timeout);
    println!("  auto_approve        = {}", config.auto_approve);
    println!(
        "  system_prompt       = {}",
        if config.system_prompt.is_some() { "custom" } else { "built-in" }
    );
    if let Err(e) = config.validate() {
        println!();
        println!("  invalid: {}", e);
    }
}
