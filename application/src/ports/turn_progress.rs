//! Turn progress port.
//!
//! [`TurnProgressNotifier`] is an **output port** that the presentation layer
//! implements to show what the loop is doing. All methods default to no-ops.

use termagent_domain::RiskTier;

/// Progress callbacks for one user turn.
pub trait TurnProgressNotifier: Send + Sync {
    /// A request is about to be sent; `step` is the number of tool batches so far
    fn on_thinking(&self, _step: usize) {}

    /// The reply (or a failure) arrived
    fn on_thinking_done(&self) {}

    /// An approved call is about to run
    fn on_tool_call(&self, _tool_name: &str, _risk_tier: RiskTier, _args_preview: &str) {}

    /// A call finished; `output` is the text returned to the model
    fn on_tool_result(&self, _tool_name: &str, _output: &str) {}

    /// The user refused a call
    fn on_tool_denied(&self, _tool_name: &str) {}

    /// The turn stopped at the tool-iteration cap
    fn on_iteration_cap(&self, _max_iterations: usize) {}
}

/// Notifier that prints nothing (tests, `--quiet`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}
