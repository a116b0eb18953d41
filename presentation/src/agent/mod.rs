//! Agent presentation components
//!
//! This module provides UI components for agent sessions:
//! - Interactive confirmation of risky tool calls
//! - Progress reporting while a turn runs
//! - Interactive REPL with slash commands

pub mod confirmation;
pub mod progress;
pub mod repl;

pub use confirmation::InteractiveConfirmation;
pub use progress::TurnProgressReporter;
pub use repl::{AgentRepl, SlashCommand};
