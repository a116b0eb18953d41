//! Interactive tool-call confirmation.
//!
//! # User Interface
//!
//! ```text
//! ╭─ Tool Confirmation ─────────────────────────────
//! │ Tool: delete_file
//! │ Risk: DANGEROUS
//! │ {
//! │   "path": "build/",
//! │   "recursive": true
//! │ }
//! ╰─────────────────────────────────────────────────
//! Allow? [y/n/a(lways)]
//! ```
//!
//! | Answer | Aliases | Decision |
//! |--------|---------|----------|
//! | `y` | `yes` | run this call |
//! | `n` | `no` | refuse this call |
//! | `a` | `always` | run it and turn auto-approve on |
//!
//! Anything else prints a hint and asks again. Ctrl+C or Ctrl+D cancels
//! the whole turn.

use async_trait::async_trait;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use termagent_application::{ConfirmationError, ConfirmationPort, ConfirmationRequest};
use termagent_domain::{ApprovalDecision, RiskTier, ToolCall};

const PROMPT: &str = "Allow? [y/n/a(lways)] ";
const RETRY_HINT: &str = "Enter y, n, or a";

/// Terminal implementation of [`ConfirmationPort`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveConfirmation;

impl InteractiveConfirmation {
    pub fn new() -> Self {
        Self
    }

    /// The panel shown before the prompt.
    fn render_panel(call: &ToolCall, tier: RiskTier) -> String {
        let rule = "─".repeat(50);
        let tier_label = tier.as_str().to_uppercase();
        let tier_label = match tier {
            RiskTier::Dangerous => tier_label.red().bold(),
            RiskTier::Moderate => tier_label.yellow().bold(),
            RiskTier::Safe => tier_label.green(),
        };

        let args = serde_json::to_string_pretty(&call.arguments_json())
            .unwrap_or_else(|_| "{}".to_string());

        let mut panel = format!("{}\n", format!("╭─ Tool Confirmation {}", rule).yellow());
        panel.push_str(&format!("{} {} {}\n", "│".yellow(), "Tool:".bold(), call.tool_name.cyan()));
        panel.push_str(&format!("{} {} {}\n", "│".yellow(), "Risk:".bold(), tier_label));
        for line in args.lines() {
            panel.push_str(&format!("{} {}\n", "│".yellow(), line.dimmed()));
        }
        panel.push_str(&format!("{}", format!("╰{}", "─".repeat(70)).yellow()));
        panel
    }

    /// Read lines until one parses as a decision.
    fn resolve(
        mut read_line: impl FnMut() -> Result<String, ConfirmationError>,
    ) -> Result<ApprovalDecision, ConfirmationError> {
        loop {
            let answer = read_line()?;
            match ApprovalDecision::parse(&answer) {
                Some(decision) => return Ok(decision),
                None => println!("{}", RETRY_HINT.yellow()),
            }
        }
    }

    fn read_answer(editor: &mut DefaultEditor) -> Result<String, ConfirmationError> {
        match editor.readline(PROMPT) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                Err(ConfirmationError::Cancelled)
            }
            Err(e) => Err(ConfirmationError::IoError(e.to_string())),
        }
    }
}

#[async_trait]
impl ConfirmationPort for InteractiveConfirmation {
    async fn confirm(
        &self,
        request: &ConfirmationRequest<'_>,
    ) -> Result<ApprovalDecision, ConfirmationError> {
        println!();
        println!("{}", Self::render_panel(request.call, request.risk_tier));

        // The turn is suspended here; blocking the worker is fine.
        let decision = tokio::task::block_in_place(|| {
            let mut editor =
                DefaultEditor::new().map_err(|e| ConfirmationError::IoError(e.to_string()))?;
            Self::resolve(|| Self::read_answer(&mut editor))
        })?;

        if decision == ApprovalDecision::AllowAlways {
            println!("{}", "Auto-approve enabled for moderate tools.".dimmed());
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn scripted(answers: &[&str]) -> impl FnMut() -> Result<String, ConfirmationError> {
        let mut queue: VecDeque<String> = answers.iter().map(|s| s.to_string()).collect();
        move || queue.pop_front().ok_or(ConfirmationError::Cancelled)
    }

    #[test]
    fn test_resolve_accepts_aliases() {
        assert_eq!(
            InteractiveConfirmation::resolve(scripted(&["yes"])),
            Ok(ApprovalDecision::AllowOnce)
        );
        assert_eq!(
            InteractiveConfirmation::resolve(scripted(&["N"])),
            Ok(ApprovalDecision::Deny)
        );
        assert_eq!(
            InteractiveConfirmation::resolve(scripted(&["always"])),
            Ok(ApprovalDecision::AllowAlways)
        );
    }

    #[test]
    fn test_resolve_reprompts_on_invalid_input() {
        assert_eq!(
            InteractiveConfirmation::resolve(scripted(&["maybe", "", "a"])),
            Ok(ApprovalDecision::AllowAlways)
        );
    }

    #[test]
    fn test_resolve_propagates_cancel() {
        assert_eq!(
            InteractiveConfirmation::resolve(scripted(&["what"])),
            Err(ConfirmationError::Cancelled)
        );
    }

    #[test]
    fn test_panel_shows_tool_tier_and_arguments() {
        colored::control::set_override(false);
        let call = ToolCall::new("delete_file")
            .with_arg("path", "build/")
            .with_arg("recursive", true);
        let panel = InteractiveConfirmation::render_panel(&call, RiskTier::Dangerous);

        assert!(panel.contains("Tool: delete_file"));
        assert!(panel.contains("Risk: DANGEROUS"));
        assert!(panel.contains("\"path\": \"build/\""));
        assert!(panel.contains("\"recursive\": true"));
    }
}
