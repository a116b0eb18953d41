//! Ollama tool schema converter.
//!
//! Implementation of [`ToolSchemaPort`] producing the function-calling
//! format accepted by Ollama's `/api/chat` `tools` field.

use serde_json::{Map, Value, json};
use termagent_application::ports::tool_schema::ToolSchemaPort;
use termagent_domain::tool::entities::ToolDefinition;

/// Produces `{"type": "function", "function": {...}}` entries.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - `"object"` → `"object"`
/// - anything else → `"string"`
#[derive(Debug, Clone, Copy, Default)]
pub struct OllamaToolSchema;

fn json_type(param_type: &str) -> &'static str {
    match param_type {
        "number" => "number",
        "integer" => "integer",
        "boolean" => "boolean",
        "object" => "object",
        _ => "string",
    }
}

impl ToolSchemaPort for OllamaToolSchema {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": json_type(&param.param_type),
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}
