//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain registry) from "how the service
//! wants them described" (infrastructure).

use termagent_domain::tool::{entities::ToolDefinition, registry::ToolRegistry};

/// Port for converting tool definitions to the completion service's format.
pub trait ToolSchemaPort: Send + Sync {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Every registered tool, in registry order.
    fn all_tools_schema(&self, registry: &ToolRegistry) -> Vec<serde_json::Value> {
        registry
            .describe()
            .iter()
            .map(|t| self.tool_to_schema(t))
            .collect()
    }
}
