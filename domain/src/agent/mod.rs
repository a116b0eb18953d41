//! Agent domain — the approval gate and the turn state machine.
//!
//! - [`risk_policy::RiskPolicy`] — session auto-approve state and the gate rule
//! - [`turn::TurnState`] — states of one user turn

pub mod risk_policy;
pub mod turn;
