//! Confirmation port for tool calls that need a human answer.
//!
//! # Architecture
//!
//! - **Port**: [`ConfirmationPort`] - defined here in the application layer
//! - **Adapter**: `InteractiveConfirmation` - implemented in the presentation layer
//!
//! # Flow
//!
//! ```text
//! model requests tool
//!        ↓
//! RiskPolicy::evaluate(tier)
//!        ├─ AutoApproved       → dispatch
//!        └─ NeedsConfirmation  → ConfirmationPort::confirm()
//!                                    ↓
//!                   AllowOnce / Deny / AllowAlways
//! ```
//!
//! The loop is suspended while `confirm` runs; nothing else happens in the
//! conversation until it returns.
//!
//! # Built-in Implementations
//!
//! - [`AutoDenyConfirmation`] - refuses every call (no terminal to ask on)

use async_trait::async_trait;
use termagent_domain::{ApprovalDecision, RiskTier, ToolCall};

/// Error type for confirmation operations.
///
/// These are failures of the prompt itself, not the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// User interrupted the prompt (Ctrl+C / Ctrl+D)
    Cancelled,
    /// Terminal read or write failure
    IoError(String),
}

impl std::fmt::Display for ConfirmationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmationError::Cancelled => write!(f, "Confirmation cancelled"),
            ConfirmationError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ConfirmationError {}

/// What the user is asked about.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationRequest<'a> {
    pub call: &'a ToolCall,
    pub risk_tier: RiskTier,
}

/// Port for asking the user whether a tool call may run.
///
/// Implementations show the tool name, its risk tier and its arguments, and
/// keep asking until they get one of the three answers. Invalid input is
/// never treated as a denial.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn confirm(
        &self,
        request: &ConfirmationRequest<'_>,
    ) -> Result<ApprovalDecision, ConfirmationError>;
}

/// Denies every call that reaches the prompt.
///
/// Used when stdin is not a terminal: safe tools still run, and moderate
/// ones run only with auto-approve on.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDenyConfirmation;

#[async_trait]
impl ConfirmationPort for AutoDenyConfirmation {
    async fn confirm(
        &self,
        request: &ConfirmationRequest<'_>,
    ) -> Result<ApprovalDecision, ConfirmationError> {
        tracing::info!(
            "No interactive terminal: denying {} call '{}'",
            request.risk_tier,
            request.call.tool_name
        );
        Ok(ApprovalDecision::Deny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_deny() {
        let call = ToolCall::new("delete_file").with_arg("path", "/tmp/x");
        let request = ConfirmationRequest {
            call: &call,
            risk_tier: RiskTier::Dangerous,
        };
        let decision = AutoDenyConfirmation.confirm(&request).await.unwrap();
        assert_eq!(decision, ApprovalDecision::Deny);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ConfirmationError::Cancelled.to_string(), "Confirmation cancelled");
        assert_eq!(
            ConfirmationError::IoError("stdin closed".to_string()).to_string(),
            "I/O error: stdin closed"
        );
    }
}
