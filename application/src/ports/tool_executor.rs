//! Tool Executor port
//!
//! Defines the interface for running the registered tools (shell, files,
//! search, web, device). Implementations live in the infrastructure layer.

use async_trait::async_trait;
use termagent_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    registry::ToolRegistry,
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// `execute` receives calls that already passed name and argument checks.
/// Handlers report failures through [`ToolResult::failure`] and enforce
/// their own timeouts.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// The fixed catalog of tools this executor can run
    fn registry(&self) -> &ToolRegistry;

    fn has_tool(&self, name: &str) -> bool {
        self.registry().contains(name)
    }

    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.registry().lookup(name)
    }

    fn available_tools(&self) -> Vec<&str> {
        self.registry().names().collect()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
