//! Progress reporting for one agent turn

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use termagent_application::TurnProgressNotifier;
use termagent_domain::{RiskTier, truncate};

/// Characters of a tool result echoed under the call
const RESULT_PREVIEW_CHARS: usize = 300;

/// Spinner while the model thinks, one line per tool call.
///
/// ```text
/// ⠋ Thinking... (step 2)
/// ▶ Executing: list_directory  .
///   📁 src/
///   📄 Cargo.toml  (1.2 KB)
/// ↳ Denied
/// ```
pub struct TurnProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TurnProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.spinner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_spinner(&self) {
        if let Some(pb) = self.slot().take() {
            pb.finish_and_clear();
        }
    }

    fn tier_label(tier: RiskTier) -> colored::ColoredString {
        match tier {
            RiskTier::Safe => tier.as_str().green(),
            RiskTier::Moderate => tier.as_str().yellow(),
            RiskTier::Dangerous => tier.as_str().red(),
        }
    }
}

impl Default for TurnProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for TurnProgressReporter {
    fn on_thinking(&self, step: usize) {
        self.clear_spinner();

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(format!("Thinking... (step {})", step + 1));
        pb.enable_steady_tick(Duration::from_millis(100));

        *self.slot() = Some(pb);
    }

    fn on_thinking_done(&self) {
        self.clear_spinner();
    }

    fn on_tool_call(&self, tool_name: &str, risk_tier: RiskTier, args_preview: &str) {
        self.clear_spinner();
        let args = if args_preview.is_empty() {
            String::new()
        } else {
            format!("  {}", args_preview.dimmed())
        };
        println!(
            "{} {} [{}]{}",
            "▶ Executing:".cyan().bold(),
            tool_name.bold(),
            Self::tier_label(risk_tier),
            args
        );
    }

    fn on_tool_result(&self, _tool_name: &str, output: &str) {
        let preview = truncate(output.trim_end(), RESULT_PREVIEW_CHARS);
        for line in preview.lines() {
            println!("  {}", line.dimmed());
        }
    }

    fn on_tool_denied(&self, tool_name: &str) {
        self.clear_spinner();
        println!("{} {}", "↳ Denied".red(), tool_name.dimmed());
    }

    fn on_iteration_cap(&self, max_iterations: usize) {
        self.clear_spinner();
        println!(
            "{}",
            format!("⚠ Stopped after {} tool rounds", max_iterations).yellow()
        );
    }
}
