//! Normalized completion reply.
//!
//! Whatever shape the service returns, the gateway reduces it to an
//! [`AssistantReply`]: the text content plus the ordered tool calls.
//! The orchestration loop only ever inspects this type.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Assistant reply from one completion round trip.
///
/// ```
/// use termagent_domain::session::response::AssistantReply;
/// use termagent_domain::tool::entities::ToolCall;
///
/// let answer = AssistantReply::from_text("Done.");
/// assert!(!answer.has_tool_calls());
///
/// let request = AssistantReply::new("", vec![ToolCall::new("termux_battery")]);
/// assert!(request.has_tool_calls());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantReply {
    pub fn new(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn from_text(content: impl Into<String>) -> Self {
        Self::new(content, Vec::new())
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
