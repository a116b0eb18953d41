//! Infrastructure layer for termagent
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Ollama chat gateway, the built-in tool
//! executor and its schema converter, and configuration file loading.

pub mod config;
pub mod ollama;
pub mod tools;

// Re-export commonly used types
pub use config::{AgentConfig, ConfigLoader, ConfigSource, ConfigValidationError};
pub use ollama::{
    error::OllamaError,
    gateway::{OllamaLlmGateway, OllamaSettings},
};
pub use tools::{BuiltinTool, LocalToolExecutor, OllamaToolSchema, default_registry};
