//! Local tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! [`LocalToolExecutor`] bridges the application layer's abstract port with
//! actual system operations: file I/O, process execution, content search,
//! HTTP requests and Termux:API binaries.
//!
//! # Execution Paths
//!
//! ```text
//! ToolExecutorPort::execute()
//!   └─ BuiltinTool::from_name()
//!        ├─ file / search          → synchronous std::fs
//!        ├─ command / package      → tokio::process with per-tool timeout
//!        ├─ fetch_url / web_search → shared reqwest::Client
//!        └─ termux_*               → TermuxTool::execute()
//! ```

use super::{BuiltinTool, command, file, package, search, system, web};
use async_trait::async_trait;
use std::time::Duration;
use termagent_application::ports::tool_executor::ToolExecutorPort;
use termagent_domain::tool::{
    entities::ToolCall,
    registry::ToolRegistry,
    value_objects::{ToolError, ToolResult},
};
use tracing::debug;

/// Default timeout for `run_command`, `python_exec` and the list tools
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Executor that runs tools on the local machine.
///
/// | Constructor | Tools | Use Case |
/// |-------------|-------|----------|
/// | [`new()`](Self::new) | All built-in tools | Agent sessions |
/// | [`with_registry()`](Self::with_registry) | Custom [`ToolRegistry`] | Testing / restricted setups |
///
/// Calls for names outside the registry are refused even when a built-in
/// handler exists for them.
#[derive(Debug, Clone)]
pub struct LocalToolExecutor {
    registry: ToolRegistry,
    http_client: reqwest::Client,
    command_timeout: Duration,
}

impl LocalToolExecutor {
    /// Create an executor with every built-in tool.
    pub fn new() -> Self {
        Self::with_registry(super::default_registry())
    }

    /// Create an executor restricted to `registry`.
    pub fn with_registry(registry: ToolRegistry) -> Self {
        // Per-request timeouts are set by the web tools themselves
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("termagent/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            registry,
            http_client,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set the timeout for shell and Python execution.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    async fn execute_builtin(&self, tool: BuiltinTool, call: &ToolCall) -> ToolResult {
        let timeout = self.command_timeout;
        match tool {
            BuiltinTool::RunCommand => command::execute_run_command(call, timeout).await,
            BuiltinTool::ReadFile => file::execute_read_file(call),
            BuiltinTool::WriteFile => file::execute_write_file(call),
            BuiltinTool::AppendFile => file::execute_append_file(call),
            BuiltinTool::ListDirectory => file::execute_list_directory(call),
            BuiltinTool::SearchFiles => search::execute_search_files(call),
            BuiltinTool::SearchInFiles => search::execute_search_in_files(call),
            BuiltinTool::GetSystemInfo => system::execute_get_system_info().await,
            BuiltinTool::FetchUrl => web::fetch::execute_fetch_url(&self.http_client, call).await,
            BuiltinTool::PythonExec => command::execute_python_exec(call, timeout).await,
            BuiltinTool::WebSearch => {
                web::search::execute_web_search(&self.http_client, call).await
            }
            BuiltinTool::PkgInstall => package::execute_pkg_install(call).await,
            BuiltinTool::PkgUninstall => package::execute_pkg_uninstall(call).await,
            BuiltinTool::PkgList => package::execute_pkg_list(call, timeout).await,
            BuiltinTool::PipInstall => package::execute_pip_install(call).await,
            BuiltinTool::PipList => package::execute_pip_list(call, timeout).await,
            BuiltinTool::DeleteFile => file::execute_delete_file(call),
            BuiltinTool::MoveFile => file::execute_move_file(call),
            BuiltinTool::CopyFile => file::execute_copy_file(call),
            BuiltinTool::Termux(t) => t.execute(call).await,
        }
    }
}

impl Default for LocalToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let tool = match BuiltinTool::from_name(&call.tool_name) {
            Some(tool) if self.registry.contains(&call.tool_name) => tool,
            _ => {
                return ToolResult::failure(
                    &call.tool_name,
                    ToolError::not_found(format!("Unknown tool: {}", call.tool_name)),
                );
            }
        };

        debug!("Executing built-in tool '{}'", call.tool_name);
        self.execute_builtin(tool, call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_executor_has_all_tools() {
        let executor = LocalToolExecutor::new();
        assert_eq!(executor.registry().len(), 37);
        assert!(executor.has_tool("read_file"));
        assert!(executor.has_tool("termux_battery"));
        assert!(!executor.has_tool("nonexistent"));
    }

    #[test]
    fn test_command_timeout_override() {
        let executor = LocalToolExecutor::new().with_command_timeout(Duration::from_secs(5));
        assert_eq!(executor.command_timeout(), Duration::from_secs(5));
        assert_eq!(
            LocalToolExecutor::default().command_timeout(),
            DEFAULT_COMMAND_TIMEOUT
        );
    }

    #[tokio::test]
    async fn test_executor_unknown_tool() {
        let executor = LocalToolExecutor::new();
        let result = executor.execute(&ToolCall::new("unknown_tool")).await;
        assert!(!result.is_success());
        assert_eq!(result.error.unwrap().code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_restricted_registry_refuses_other_builtins() {
        let registry = ToolRegistry::new().register(file::read_file_definition());
        let executor = LocalToolExecutor::with_registry(registry);

        let dir = tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let call = ToolCall::new("write_file")
            .with_arg("path", target.to_str().unwrap())
            .with_arg("content", "x");
        let result = executor.execute(&call).await;

        assert!(!result.is_success());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_executor_write_then_read() {
        let executor = LocalToolExecutor::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let path_str = path.to_str().unwrap();

        let write = ToolCall::new("write_file")
            .with_arg("path", path_str)
            .with_arg("content", "alpha\nbeta\n");
        assert!(executor.execute(&write).await.is_success());
        assert_eq!(fs::read_to_string(&path).unwrap(), "alpha\nbeta\n");

        let read = ToolCall::new("read_file").with_arg("path", path_str);
        let text = executor.execute(&read).await.into_text();
        assert!(text.starts_with("[2 lines]"));
        assert!(text.contains("beta"));
    }

    #[tokio::test]
    async fn test_executor_run_command() {
        let executor = LocalToolExecutor::new();
        let call = ToolCall::new("run_command").with_arg("command", "echo hello");
        let text = executor.execute(&call).await.into_text();
        assert!(text.contains("STDOUT:\nhello"));
        assert!(text.contains("EXIT CODE: 0"));
    }
}
