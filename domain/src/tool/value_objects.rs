//! Tool domain value objects — outcome and error types of a tool run.
//!
//! A [`ToolResult`] never leaves the dispatcher as a structured value: it is
//! rendered with [`ToolResult::into_text`] and handed to the model as the
//! content of a `tool` message. Failures become text starting with
//! [`ERROR_MARKER`] so the model can react to them conversationally.

use serde::{Deserialize, Serialize};

/// Prefix of every failure rendered for the model.
pub const ERROR_MARKER: &str = "ERROR";

/// Error produced by a tool handler.
///
/// | Code | Typical cause |
/// |------|---------------|
/// | `NOT_FOUND` | missing file, directory or binary |
/// | `INVALID_ARGUMENT` | argument present but unusable |
/// | `EXECUTION_FAILED` | I/O error, non-zero exit, HTTP failure |
/// | `TIMEOUT` | handler hit its own deadline |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new("TIMEOUT", message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Outcome of one tool handler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Plain-text form handed back to the model.
    pub fn into_text(self) -> String {
        match (self.success, self.error) {
            (false, Some(err)) => match err.details {
                Some(details) => format!("{}: {}\n{}", ERROR_MARKER, err.message, details),
                None => format!("{}: {}", ERROR_MARKER, err.message),
            },
            _ => self.output.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_text_is_output() {
        let result = ToolResult::success("pkg_list", "bash\ncurl");
        assert!(result.is_success());
        assert_eq!(result.into_text(), "bash\ncurl");
    }

    #[test]
    fn test_failure_text_has_marker() {
        let result = ToolResult::failure(
            "read_file",
            ToolError::not_found("File not found: /nope.txt"),
        );
        assert_eq!(result.into_text(), "ERROR: File not found: /nope.txt");
    }

    #[test]
    fn test_failure_details_on_next_line() {
        let err = ToolError::execution_failed("pip exited with 1").with_details("no network");
        assert_eq!(err.to_string(), "[EXECUTION_FAILED] pip exited with 1 (no network)");
        let text = ToolResult::failure("pip_install", err).into_text();
        assert_eq!(text, "ERROR: pip exited with 1\nno network");
    }
}
