//! Presentation layer for termagent
//!
//! This crate contains the CLI definition, the interactive REPL,
//! the confirmation prompt, progress reporting and console formatting.

pub mod agent;
pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use agent::{AgentRepl, InteractiveConfirmation, SlashCommand, TurnProgressReporter};
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use output::console::ConsoleFormatter;
