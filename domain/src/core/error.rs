//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid model name: '{0}'")]
    InvalidModel(String),

    #[error("Invalid limit: {name} must be greater than zero")]
    InvalidLimit { name: &'static str },
}
