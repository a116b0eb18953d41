//! Turn state machine.
//!
//! ```text
//! AwaitingModel ──reply──▶ InspectingResponse ──no tool calls──▶ Done
//!       ▲                         │
//!       │                    tool calls
//!       │                         ▼
//!       └────batch done──── ExecutingTools ──cap reached──▶ IterationCapReached
//! ```

use serde::{Deserialize, Serialize};

/// Text recorded as the tool result when the user refuses a call.
pub const DENIAL_TEXT: &str = "Tool call was denied by the user.";

/// Answer of a turn that hit the tool-iteration cap.
pub const ITERATION_CAP_TEXT: &str =
    "(Reached maximum tool iterations. The task may be incomplete.)";

/// State of one user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    AwaitingModel,
    InspectingResponse,
    ExecutingTools,
    Done,
    IterationCapReached,
}

impl TurnState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnState::AwaitingModel => "awaiting_model",
            TurnState::InspectingResponse => "inspecting_response",
            TurnState::ExecutingTools => "executing_tools",
            TurnState::Done => "done",
            TurnState::IterationCapReached => "iteration_cap_reached",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Done | TurnState::IterationCapReached)
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a finished turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Final answer; also appended to the transcript unless empty
    pub answer: String,
    /// `Done` or `IterationCapReached`
    pub final_state: TurnState,
    /// Requests sent to the completion service
    pub round_trips: usize,
    /// Tool batches executed
    pub tool_batches: usize,
    /// Set when the answer is a transport error message
    pub transport_failed: bool,
}

impl TurnOutcome {
    pub fn hit_iteration_cap(&self) -> bool {
        self.final_state == TurnState::IterationCapReached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TurnState::Done.is_terminal());
        assert!(TurnState::IterationCapReached.is_terminal());
        assert!(!TurnState::AwaitingModel.is_terminal());
        assert!(!TurnState::ExecutingTools.is_terminal());
        assert_eq!(TurnState::IterationCapReached.to_string(), "iteration_cap_reached");
    }
}
