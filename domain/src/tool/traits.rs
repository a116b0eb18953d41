//! Tool domain traits
//!
//! Argument checking is pure and lives here; the async execution seam is
//! the `ToolExecutorPort` in the application layer.

use super::entities::{ToolCall, ToolDefinition};

/// Checks a call's arguments against the tool's declared parameters.
pub trait ToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Rejects missing required parameters and parameters the tool does not declare.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        let missing: Vec<&str> = definition
            .parameters
            .iter()
            .filter(|p| p.required && call.arguments.get(&p.name).is_none_or(|v| v.is_null()))
            .map(|p| p.name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "missing required argument(s): {}",
                missing.join(", ")
            ));
        }

        let mut unexpected: Vec<&str> = call
            .arguments
            .keys()
            .map(|k| k.as_str())
            .filter(|k| !definition.parameters.iter().any(|p| p.name == *k))
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort_unstable();
            return Err(format!(
                "unexpected argument(s): {}",
                unexpected.join(", ")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{RiskTier, ToolParameter};

    fn move_file() -> ToolDefinition {
        ToolDefinition::new("move_file", "Move", RiskTier::Moderate)
            .with_parameter(ToolParameter::new("source", "Source", true))
            .with_parameter(ToolParameter::new("destination", "Destination", true))
    }

    #[test]
    fn test_missing_required_lists_every_name() {
        let err = DefaultToolValidator
            .validate(&ToolCall::new("move_file"), &move_file())
            .unwrap_err();
        assert_eq!(err, "missing required argument(s): source, destination");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let call = ToolCall::new("move_file")
            .with_arg("source", serde_json::Value::Null)
            .with_arg("destination", "b");
        let err = DefaultToolValidator.validate(&call, &move_file()).unwrap_err();
        assert!(err.contains("source"));
    }

    #[test]
    fn test_unexpected_argument() {
        let call = ToolCall::new("move_file")
            .with_arg("source", "a")
            .with_arg("destination", "b")
            .with_arg("force", true);
        let err = DefaultToolValidator.validate(&call, &move_file()).unwrap_err();
        assert_eq!(err, "unexpected argument(s): force");
    }

    #[test]
    fn test_complete_call_passes() {
        let call = ToolCall::new("move_file")
            .with_arg("source", "a")
            .with_arg("destination", "b");
        assert!(DefaultToolValidator.validate(&call, &move_file()).is_ok());
    }
}
