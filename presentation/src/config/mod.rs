//! Presentation-level configuration
//!
//! Configuration for REPL behavior.

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show the spinner and tool call lines
    pub show_progress: bool,
    /// Path to history file (default: data dir `termagent/history.txt`)
    pub history_file: Option<String>,
    /// Print turn errors with full detail
    pub debug: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
            debug: false,
        }
    }
}
