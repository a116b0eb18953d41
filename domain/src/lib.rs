//! Domain layer for termagent
//!
//! Pure types and rules of the tool-calling agent, with no I/O:
//!
//! - **Tools**: [`RiskTier`], [`ToolDefinition`], the ordered [`ToolRegistry`],
//!   [`ToolCall`] with argument normalization, and [`ToolResult`] rendering
//! - **Approval gate**: [`RiskPolicy`] and [`should_auto_approve`]
//! - **Conversation**: [`Message`] and the trimmed [`Conversation`] transcript
//! - **Turns**: the [`TurnState`] machine and its fixed texts

pub mod agent;
pub mod core;
pub mod prompt;
pub mod session;
pub mod tool;

pub use agent::{
    risk_policy::{ApprovalDecision, GateOutcome, RiskPolicy, should_auto_approve},
    turn::{DENIAL_TEXT, ITERATION_CAP_TEXT, TurnOutcome, TurnState},
};
pub use core::{
    error::DomainError,
    model::{DEFAULT_MODEL, Model},
    string::{truncate, truncate_output},
};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, system_prompt};
pub use session::{
    conversation::{Conversation, HistorySummary},
    entities::{Message, Role},
    response::AssistantReply,
};
pub use tool::{
    entities::{RiskTier, ToolArguments, ToolCall, ToolDefinition, ToolParameter, parse_arguments},
    registry::ToolRegistry,
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ERROR_MARKER, ToolError, ToolResult},
};
