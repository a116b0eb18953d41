//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — identifier of the model serving completions
//! - [`error::DomainError`] — domain-level errors
//! - [`string`] — preview and output truncation helpers

pub mod error;
pub mod model;
pub mod string;
