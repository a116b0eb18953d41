//! Tool registry — the fixed catalog of tools known to the agent.

use super::entities::{RiskTier, ToolDefinition};
use std::collections::HashMap;

/// Ordered, immutable catalog of tool definitions.
///
/// Built once at startup with [`register`](Self::register) and only read
/// afterwards. Registration order is preserved and is the order in which
/// schemas are advertised to the completion service on every request.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A later registration with the same name replaces the
    /// earlier definition in place, keeping its position.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        match self.index.get(&tool.name) {
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
        self
    }

    /// All definitions in registration order.
    pub fn describe(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&pos| &self.tools[pos])
    }

    /// Risk tier of `name`; unknown names are moderate.
    pub fn risk_of(&self, name: &str) -> RiskTier {
        self.lookup(name).map(|t| t.risk_tier).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ToolRegistry {
        ToolRegistry::new()
            .register(ToolDefinition::new("run_command", "Run", RiskTier::Moderate))
            .register(ToolDefinition::new("read_file", "Read", RiskTier::Safe))
            .register(ToolDefinition::new("delete_file", "Delete", RiskTier::Dangerous))
    }

    #[test]
    fn test_describe_keeps_registration_order() {
        let registry = sample();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["run_command", "read_file", "delete_file"]);
        assert_eq!(registry.describe().len(), 3);
    }

    #[test]
    fn test_lookup() {
        let registry = sample();
        assert_eq!(registry.lookup("read_file").unwrap().description, "Read");
        assert!(registry.lookup("rm_rf").is_none());
        assert!(registry.contains("delete_file"));
    }

    #[test]
    fn test_risk_of_unknown_is_moderate() {
        let registry = sample();
        assert_eq!(registry.risk_of("read_file"), RiskTier::Safe);
        assert_eq!(registry.risk_of("delete_file"), RiskTier::Dangerous);
        assert_eq!(registry.risk_of("no_such_tool"), RiskTier::Moderate);
    }

    #[test]
    fn test_reregistering_replaces_in_place() {
        let registry =
            sample().register(ToolDefinition::new("run_command", "Shell", RiskTier::Dangerous));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.describe()[0].description, "Shell");
        assert_eq!(registry.risk_of("run_command"), RiskTier::Dangerous);
    }
}
