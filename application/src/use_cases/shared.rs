//! Shared helpers for use cases: cancellation checks and argument previews.

use super::run_turn::RunTurnError;
use termagent_domain::ToolCall;
use tokio_util::sync::CancellationToken;

/// `Err(Cancelled)` once the user has interrupted the turn.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), RunTurnError> {
    if token.is_cancelled() {
        return Err(RunTurnError::Cancelled);
    }
    Ok(())
}

/// Short human-readable hint of what a call operates on.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    const KEYS: [&str; 7] = ["path", "command", "pattern", "query", "url", "source", "packages"];
    KEYS.iter()
        .find_map(|key| call.get_string(key))
        .or_else(|| call.arguments.values().find_map(|v| v.as_str()))
        .map(|s| preview(s, 60))
        .unwrap_or_default()
}

fn preview(s: &str, max_chars: usize) -> String {
    let first_line = s.lines().next().unwrap_or_default();
    if first_line.chars().count() <= max_chars && first_line.len() == s.len() {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
