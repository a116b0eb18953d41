//! Risk policy — decides which tool calls need a human answer.
//!
//! The gate rule is a pure function of the tool's [`RiskTier`] and the
//! session's auto-approve flag:
//!
//! | Tier | flag off | flag on |
//! |------|----------|---------|
//! | safe | auto | auto |
//! | moderate | confirm | auto |
//! | dangerous | confirm | confirm |
//!
//! The flag lives in a [`RiskPolicy`] value owned by the session and passed
//! into each turn, never in global state.

use crate::tool::entities::RiskTier;
use serde::{Deserialize, Serialize};

/// Whether a call of `tier` may run without asking.
///
/// Dangerous tools always ask, whatever `auto_approve` says.
pub fn should_auto_approve(tier: RiskTier, auto_approve: bool) -> bool {
    match tier {
        RiskTier::Safe => true,
        RiskTier::Moderate => auto_approve,
        RiskTier::Dangerous => false,
    }
}

/// Answer given at the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Run this call only
    AllowOnce,
    /// Do not run; the model is told the user refused
    Deny,
    /// Run this call and turn auto-approve on for the session
    AllowAlways,
}

impl ApprovalDecision {
    /// Parse a prompt answer: `y`/`yes`, `n`/`no`, `a`/`always` (any case).
    ///
    /// Anything else is `None` so the caller can ask again.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Self::AllowOnce),
            "n" | "no" => Some(Self::Deny),
            "a" | "always" => Some(Self::AllowAlways),
            _ => None,
        }
    }

    pub fn allows(&self) -> bool {
        !matches!(self, Self::Deny)
    }
}

/// Outcome of checking a call against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    AutoApproved,
    NeedsConfirmation,
}

/// Session-scoped approval state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPolicy {
    auto_approve: bool,
}

impl RiskPolicy {
    pub fn new(auto_approve: bool) -> Self {
        Self { auto_approve }
    }

    pub fn auto_approve(&self) -> bool {
        self.auto_approve
    }

    pub fn set_auto_approve(&mut self, enabled: bool) {
        self.auto_approve = enabled;
    }

    /// Flip the flag, returning the new value (`/yolo`).
    pub fn toggle_auto_approve(&mut self) -> bool {
        self.auto_approve = !self.auto_approve;
        self.auto_approve
    }

    pub fn evaluate(&self, tier: RiskTier) -> GateOutcome {
        if should_auto_approve(tier, self.auto_approve) {
            GateOutcome::AutoApproved
        } else {
            GateOutcome::NeedsConfirmation
        }
    }

    /// Record the user's answer; returns whether the call may run.
    ///
    /// `AllowAlways` enables auto-approve, which only ever affects moderate
    /// tools: a dangerous call answered with "always" runs this once and the
    /// next dangerous call still asks.
    pub fn apply(&mut self, decision: ApprovalDecision) -> bool {
        if decision == ApprovalDecision::AllowAlways {
            self.auto_approve = true;
        }
        decision.allows()
    }
}
