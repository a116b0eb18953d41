//! Execution parameters — turn loop control.
//!
//! [`ExecutionParams`] groups the static limits used by
//! [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase) and the
//! [`ToolDispatcher`](crate::use_cases::dispatch::ToolDispatcher).

use serde::{Deserialize, Serialize};
use termagent_domain::DomainError;

/// Loop control parameters.
///
/// | Field | Default | Bounds |
/// |-------|---------|--------|
/// | `max_tool_iterations` | 15 | tool batches per user turn |
/// | `max_output_chars` | 15000 | characters of one tool result |
/// | `max_history` | 50 | message pairs kept after the system prompt |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    pub max_tool_iterations: usize,
    pub max_output_chars: usize,
    pub max_history: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_tool_iterations: 15,
            max_output_chars: 15_000,
            max_history: 50,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    pub fn with_max_output_chars(mut self, max: usize) -> Self {
        self.max_output_chars = max;
        self
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    /// Every limit must be non-zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        let limits = [
            ("max_tool_iterations", self.max_tool_iterations),
            ("max_output_chars", self.max_output_chars),
            ("max_history", self.max_history),
        ];
        match limits.iter().find(|(_, value)| *value == 0) {
            Some(&(name, _)) => Err(DomainError::InvalidLimit { name }),
            None => Ok(()),
        }
    }
}
