//! Error types for the Ollama adapter

use termagent_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for Ollama operations
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Errors that can occur when talking to the Ollama API
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Could not connect to {host}: {source}")]
    Connect {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    InvalidBody(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<OllamaError> for GatewayError {
    fn from(err: OllamaError) -> Self {
        match err {
            OllamaError::Connect { .. } => GatewayError::ConnectionError(err.to_string()),
            OllamaError::Timeout(_) => GatewayError::Timeout,
            OllamaError::Status { .. } => GatewayError::RequestFailed(err.to_string()),
            OllamaError::InvalidBody(_) => GatewayError::InvalidResponse(err.to_string()),
            OllamaError::Http(_) => GatewayError::Other(err.to_string()),
        }
    }
}
