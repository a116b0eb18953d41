//! Ollama chat adapter
//!
//! Implements LlmGateway against Ollama's `/api/chat` endpoint (local
//! daemon or the hosted service at `https://ollama.com`).

pub mod error;
pub mod gateway;
pub mod protocol;
