//! Shell and interpreter tools: run_command, python_exec

use super::file::expand_home;
use super::process::{self, ProcessError, ProcessJob};
use std::time::Duration;
use termagent_domain::tool::{
    entities::{RiskTier, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

/// Tool name constants
pub const RUN_COMMAND: &str = "run_command";
pub const PYTHON_EXEC: &str = "python_exec";

/// Interpreter used by `python_exec` and the pip tools
pub const PYTHON: &str = "python3";

/// Ceiling for a `timeout` argument supplied with `run_command`
pub const MAX_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a shell command on the user's device and return its stdout and stderr. \
         Use this for running scripts, git operations, system tasks, etc.",
        RiskTier::Moderate,
    )
    .with_parameter(ToolParameter::new("command", "The shell command to execute.", true))
    .with_parameter(
        ToolParameter::new(
            "working_dir",
            "Optional working directory. Defaults to current dir.",
            false,
        )
        .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("timeout", "Timeout in seconds (default 60, at most 600).", false)
            .with_type("integer"),
    )
}

pub fn python_exec_definition() -> ToolDefinition {
    ToolDefinition::new(
        PYTHON_EXEC,
        "Execute a Python code snippet and return its stdout output. \
         Use for calculations, data processing, or quick scripts.",
        RiskTier::Moderate,
    )
    .with_parameter(ToolParameter::new("code", "Python code to execute.", true))
}

/// Execute the run_command tool
///
/// A non-zero exit status is still a successful tool run: the exit code is
/// part of the output and the model decides what to do with it.
pub async fn execute_run_command(call: &ToolCall, default_timeout: Duration) -> ToolResult {
    let command = match call.require_string("command") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(RUN_COMMAND, ToolError::invalid_argument(e)),
    };

    let timeout = requested_timeout(call, default_timeout);

    let working_dir = call
        .get_string("working_dir")
        .filter(|d| !d.is_empty())
        .map(expand_home);
    if let Some(dir) = &working_dir
        && !dir.is_dir()
    {
        return ToolResult::failure(
            RUN_COMMAND,
            ToolError::not_found(format!("Working directory not found: {}", dir.display())),
        );
    }

    run_shell(RUN_COMMAND, command, working_dir.as_deref(), timeout).await
}

/// The call's `timeout` argument, capped at [`MAX_COMMAND_TIMEOUT`].
fn requested_timeout(call: &ToolCall, default_timeout: Duration) -> Duration {
    call.get_i64("timeout")
        .filter(|t| *t > 0)
        .map(|t| Duration::from_secs(t as u64).min(MAX_COMMAND_TIMEOUT))
        .unwrap_or(default_timeout)
}

/// Run `command` through `sh -c` and render it the way `run_command` does.
pub(crate) async fn run_shell(
    tool_name: &str,
    command: &str,
    working_dir: Option<&std::path::Path>,
    timeout: Duration,
) -> ToolResult {
    let mut job = ProcessJob::new("sh", timeout).args(["-c", command]);
    if let Some(dir) = working_dir {
        job = job.working_dir(dir);
    }
    render_sectioned(tool_name, process::run(job).await)
}

/// `STDOUT:`/`STDERR:`/`EXIT CODE:` rendering shared with the package tools.
pub(crate) fn render_sectioned(
    tool_name: &str,
    outcome: Result<process::ProcessOutput, ProcessError>,
) -> ToolResult {
    match outcome {
        Ok(out) => ToolResult::success(tool_name, out.sectioned()),
        Err(ProcessError::Timeout(t)) => ToolResult::failure(
            tool_name,
            ToolError::timeout(format!("Command timed out after {} seconds.", t.as_secs())),
        ),
        Err(e) => ToolResult::failure(tool_name, ToolError::execution_failed(e.to_string())),
    }
}

/// Execute the python_exec tool
pub async fn execute_python_exec(call: &ToolCall, timeout: Duration) -> ToolResult {
    let code = match call.require_string("code") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(PYTHON_EXEC, ToolError::invalid_argument(e)),
    };

    match process::run(ProcessJob::new(PYTHON, timeout).args(["-c", code])).await {
        Ok(out) => {
            let mut parts = Vec::new();
            if !out.stdout.is_empty() {
                parts.push(out.stdout.clone());
            }
            if !out.stderr.is_empty() {
                parts.push(format!("STDERR:\n{}", out.stderr));
            }
            parts.push(format!("EXIT CODE: {}", out.exit_code));
            ToolResult::success(PYTHON_EXEC, parts.join("\n"))
        }
        Err(ProcessError::Timeout(t)) => ToolResult::failure(
            PYTHON_EXEC,
            ToolError::timeout(format!("Code execution timed out after {}s.", t.as_secs())),
        ),
        Err(ProcessError::NotFound(bin)) => ToolResult::failure(
            PYTHON_EXEC,
            ToolError::not_found(format!("'{}' not found. Install it with: pkg install python", bin)),
        ),
        Err(e) => ToolResult::failure(PYTHON_EXEC, ToolError::execution_failed(e.to_string())),
    }
}
