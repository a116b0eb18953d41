//! Wire types for Ollama's `/api/chat`.
//!
//! # Request
//!
//! ```json
//! {"model": "...", "messages": [...], "tools": [...], "stream": false}
//! ```
//!
//! Assistant messages that requested tools carry
//! `tool_calls: [{"function": {"name", "arguments": {...}}}]`; tool results
//! carry `tool_name`.
//!
//! # Response
//!
//! Only `message.content` and `message.tool_calls` are read, through
//! [`normalize_reply`]. A body with an `error` field or without a `message`
//! object is rejected by the gateway first.

use serde::Serialize;
use serde_json::Value;
use termagent_domain::{AssistantReply, Message, ToolCall, parse_arguments};

/// Request body for `POST /api/chat`
#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub tools: &'a [Value],
    pub stream: bool,
}

impl<'a> ChatBody<'a> {
    pub fn new(model: &'a str, messages: &'a [Message], tools: &'a [Value]) -> Self {
        Self {
            model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools,
            stream: false,
        }
    }
}

/// One transcript entry as the service expects it
#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct WireToolCall<'a> {
    pub function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
pub struct WireFunction<'a> {
    pub name: &'a str,
    /// Always a JSON object
    pub arguments: Value,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    function: WireFunction {
                        name: &call.tool_name,
                        arguments: call.arguments_json(),
                    },
                })
                .collect(),
            tool_name: msg.tool_name.as_deref(),
        }
    }
}

/// Turn a response body into an [`AssistantReply`].
///
/// - missing `content` → empty text (the gateway rejects bodies without a
///   `message` object before this runs)
/// - `arguments` as an object or a JSON-encoded string; anything else → no
///   arguments
/// - tool call entries without a function name are skipped
pub fn normalize_reply(body: &Value) -> AssistantReply {
    let message = &body["message"];
    let content = message["content"].as_str().unwrap_or_default();

    let tool_calls = message["tool_calls"]
        .as_array()
        .map(|calls| {
            calls
                .iter()
                .filter_map(|entry| {
                    let function = &entry["function"];
                    let name = function["name"].as_str().filter(|n| !n.is_empty())?;
                    Some(ToolCall {
                        tool_name: name.to_string(),
                        arguments: parse_arguments(&function["arguments"]),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    AssistantReply::new(content, tool_calls)
}
