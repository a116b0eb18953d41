//! Raw TOML configuration data types
//!
//! The config file is flat; every key can also be set through an
//! `AGENT_`-prefixed environment variable (`AGENT_MODEL`, `AGENT_MAX_HISTORY`).
//!
//! # Example
//!
//! ```toml
//! model = "qwen3-coder:480b-cloud"
//! api_host = "https://ollama.com"
//! api_key_env = "OLLAMA_API_KEY"
//! max_history = 50          # message pairs kept after the system prompt
//! command_timeout = 60      # seconds, run_command / python_exec
//! max_output_chars = 15000
//! max_tool_iterations = 15
//! request_timeout = 300     # seconds, completion service
//! auto_approve = false
//! # system_prompt = "..."
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use termagent_application::ExecutionParams;
use termagent_domain::{DEFAULT_MODEL, DomainError, Model};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroLimit(&'static str),

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("api_host cannot be empty")]
    EmptyApiHost,
}

/// Agent configuration as merged from defaults, files and environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier sent to the completion service
    pub model: String,
    /// Base URL of the Ollama API
    pub api_host: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub max_history: usize,
    /// Default timeout for shell and Python execution (seconds)
    pub command_timeout: u64,
    pub max_output_chars: usize,
    pub max_tool_iterations: usize,
    /// Transport timeout for one completion request (seconds)
    pub request_timeout: u64,
    /// Replaces the built-in system prompt when set
    pub system_prompt: Option<String>,
    /// Start sessions with auto-approve on
    pub auto_approve: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_host: "https://ollama.com".to_string(),
            api_key_env: "OLLAMA_API_KEY".to_string(),
            max_history: params.max_history,
            command_timeout: 60,
            max_output_chars: params.max_output_chars,
            max_tool_iterations: params.max_tool_iterations,
            request_timeout: 300,
            system_prompt: None,
            auto_approve: false,
        }
    }
}

impl AgentConfig {
    /// Check the limits and the model name.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.api_host.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiHost);
        }
        let limits = [
            ("max_tool_iterations", self.max_tool_iterations as u64),
            ("max_output_chars", self.max_output_chars as u64),
            ("max_history", self.max_history as u64),
            ("command_timeout", self.command_timeout),
            ("request_timeout", self.request_timeout),
        ];
        match limits.iter().find(|(_, value)| *value == 0) {
            Some(&(name, _)) => Err(ConfigValidationError::ZeroLimit(name)),
            None => Ok(()),
        }
    }

    pub fn parsed_model(&self) -> Result<Model, DomainError> {
        Model::new(&self.model)
    }

    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_tool_iterations(self.max_tool_iterations)
            .with_max_output_chars(self.max_output_chars)
            .with_max_history(self.max_history)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// The API key from the configured variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
