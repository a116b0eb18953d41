//! LLM Gateway port
//!
//! Defines the interface for one request/response exchange with the
//! completion service. Adapters live in the infrastructure layer.

use async_trait::async_trait;
use termagent_domain::{AssistantReply, Message, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One completion request: the whole transcript plus the advertised tools.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a Model,
    pub messages: &'a [Message],
    /// Tool schemas in registry order, already in the service's format
    pub tools: &'a [serde_json::Value],
}

/// Gateway for LLM communication
///
/// A failed exchange must surface as a [`GatewayError`], never as an empty
/// reply. The gateway does not retry.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<AssistantReply, GatewayError>;
}
