//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk tier of a tool.
///
/// The tier decides how the approval gate treats a call:
///
/// | Tier | Auto-approve off | Auto-approve on |
/// |------|------------------|-----------------|
/// | `Safe` | runs | runs |
/// | `Moderate` | asks | runs |
/// | `Dangerous` | asks | asks |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Read-only, no side effects
    Safe,
    /// Reversible or low-impact mutation. Unknown tools fall back here.
    #[default]
    Moderate,
    /// Destructive, irreversible, or externally consequential
    Dangerous,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Safe => "safe",
            RiskTier::Moderate => "moderate",
            RiskTier::Dangerous => "dangerous",
        }
    }

    /// Dangerous calls ignore the session auto-approve flag.
    pub fn always_confirms(&self) -> bool {
        matches!(self, RiskTier::Dangerous)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static description of a tool: name, description, parameters and risk tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub risk_tier: RiskTier,
    pub parameters: Vec<ToolParameter>,
}

/// One named parameter of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// JSON schema type: "string", "integer", "boolean", "object", ...
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_tier: RiskTier,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_tier,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Parameter names in declaration order, e.g. for `/tools` listings.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Arguments of a tool call, keyed by parameter name.
pub type ToolArguments = HashMap<String, serde_json::Value>;

/// A single tool invocation requested by the model.
///
/// Created when a completion reply is normalized and consumed once by the
/// dispatcher. Arguments are always a mapping: payloads that are not an
/// object (or a string containing one) degrade to no arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: ToolArguments,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    /// Build a call from whatever argument payload the service delivered.
    pub fn from_raw(tool_name: impl Into<String>, raw: &serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: parse_arguments(raw),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Integer argument; numeric strings such as `"42"` are accepted too.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Boolean argument; `"true"`/`"false"` strings are accepted too.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| match v {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    /// Arguments as a JSON object, keys sorted, for display and wire encoding.
    pub fn arguments_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Normalize a raw argument payload into a mapping.
///
/// - object → its entries
/// - string → parsed as JSON, then treated as above
/// - anything else, or unparseable text → empty mapping
pub fn parse_arguments(raw: &serde_json::Value) -> ToolArguments {
    match raw {
        serde_json::Value::Object(map) => map.clone().into_iter().collect(),
        serde_json::Value::String(text) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        },
        _ => HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_risk_tier_defaults_to_moderate() {
        assert_eq!(RiskTier::default(), RiskTier::Moderate);
        assert!(RiskTier::Dangerous.always_confirms());
        assert!(!RiskTier::Moderate.always_confirms());
        assert_eq!(RiskTier::Dangerous.to_string(), "dangerous");
    }

    #[test]
    fn test_tool_definition_parameters() {
        let tool = ToolDefinition::new("read_file", "Read a file", RiskTier::Safe)
            .with_parameter(ToolParameter::new("path", "File path", true))
            .with_parameter(ToolParameter::new("start_line", "First line", false).with_type("integer"));

        assert_eq!(tool.parameter_names(), vec!["path", "start_line"]);
        assert_eq!(tool.parameters[1].param_type, "integer");
    }

    #[test]
    fn test_arguments_from_object() {
        let call = ToolCall::from_raw("list_directory", &json!({"path": ".", "recursive": true}));
        assert_eq!(call.get_string("path"), Some("."));
        assert_eq!(call.get_bool("recursive"), Some(true));
    }

    #[test]
    fn test_arguments_from_encoded_string() {
        let call = ToolCall::from_raw("read_file", &json!(r#"{"path": "notes.txt", "end_line": 4}"#));
        assert_eq!(call.get_string("path"), Some("notes.txt"));
        assert_eq!(call.get_i64("end_line"), Some(4));
    }

    #[test]
    fn test_malformed_arguments_degrade_to_empty() {
        for raw in [
            json!("{not json"),
            json!("[1, 2, 3]"),
            json!("\"just a string\""),
            json!(42),
            json!(null),
            json!([{"path": "."}]),
            json!(true),
        ] {
            assert!(parse_arguments(&raw).is_empty(), "payload {raw} should be empty");
        }
    }

    #[test]
    fn test_lenient_scalar_accessors() {
        let call = ToolCall::new("termux_vibrate")
            .with_arg("duration_ms", "250")
            .with_arg("enabled", "False")
            .with_arg("ratio", 2.0);
        assert_eq!(call.get_i64("duration_ms"), Some(250));
        assert_eq!(call.get_bool("enabled"), Some(false));
        assert_eq!(call.get_i64("ratio"), Some(2));
        assert!(call.require_string("missing").is_err());
    }

    #[test]
    fn test_arguments_json_is_sorted() {
        let call = ToolCall::new("move_file")
            .with_arg("source", "a")
            .with_arg("destination", "b");
        assert_eq!(
            serde_json::to_string(&call.arguments_json()).unwrap(),
            r#"{"destination":"b","source":"a"}"#
        );
    }
}
