//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for termagent
#[derive(Parser, Debug)]
#[command(name = "termagent")]
#[command(author, version, about = "Terminal assistant that runs tools on your behalf")]
#[command(long_about = r#"
termagent turns natural-language requests into tool calls (shell commands,
file operations, web requests, Termux device actions) and asks before
running anything risky.

Risk tiers:
  safe       run without asking (read files, list directories, search)
  moderate   ask unless auto-approve is on (write files, run commands)
  dangerous  always ask (delete files, install packages, send SMS)

Configuration is merged from (highest priority first):
1. Command-line flags
2. AGENT_* environment variables (AGENT_MODEL, AGENT_MAX_HISTORY, ...)
3. --config <path>      Explicit config file
4. ./termagent.toml     Project-level config
5. ~/.config/termagent/config.toml   Global config

The API key is read from OLLAMA_API_KEY (see `api_key_env`).

Example:
  termagent
  termagent "how much disk space is left?"
  termagent --yolo -m llama3.2 "tidy up ~/Downloads"
"#)]
pub struct Cli {
    /// Run a single request and exit (interactive mode when omitted)
    pub prompt: Option<String>,

    /// Model to use
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Auto-approve moderate tools from the start (dangerous tools still ask)
    #[arg(long)]
    pub yolo: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
