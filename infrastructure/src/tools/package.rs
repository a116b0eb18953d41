//! Package tools: pkg_install, pkg_uninstall, pkg_list, pip_install, pip_list
//!
//! The system package manager is detected once per call with `which`:
//! `pkg` (Termux), then `apt`, then `apt-get`. Package names are passed as
//! separate arguments, never through a shell.

use super::command::{PYTHON, render_sectioned};
use super::process::{self, ProcessJob};
use std::time::Duration;
use termagent_domain::tool::{
    entities::{RiskTier, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

/// Tool name constants
pub const PKG_INSTALL: &str = "pkg_install";
pub const PKG_UNINSTALL: &str = "pkg_uninstall";
pub const PKG_LIST: &str = "pkg_list";
pub const PIP_INSTALL: &str = "pip_install";
pub const PIP_LIST: &str = "pip_list";

const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);
const UNINSTALL_TIMEOUT: Duration = Duration::from_secs(60);

const PACKAGE_MANAGERS: [&str; 3] = ["pkg", "apt", "apt-get"];

pub fn pkg_install_definition() -> ToolDefinition {
    ToolDefinition::new(
        PKG_INSTALL,
        "Install a system package using the package manager (pkg on Termux, apt on \
         Debian/Ubuntu). DANGEROUS: always asks for confirmation.",
        RiskTier::Dangerous,
    )
    .with_parameter(ToolParameter::new(
        "packages",
        "Space-separated package names to install.",
        true,
    ))
}

pub fn pkg_uninstall_definition() -> ToolDefinition {
    ToolDefinition::new(
        PKG_UNINSTALL,
        "Uninstall a system package. DANGEROUS: always asks for confirmation.",
        RiskTier::Dangerous,
    )
    .with_parameter(ToolParameter::new(
        "packages",
        "Space-separated package names to uninstall.",
        true,
    ))
}

pub fn pkg_list_definition() -> ToolDefinition {
    ToolDefinition::new(PKG_LIST, "List installed system packages.", RiskTier::Safe)
        .with_parameter(ToolParameter::new(
            "filter",
            "Optional filter to grep package names.",
            false,
        ))
}

pub fn pip_install_definition() -> ToolDefinition {
    ToolDefinition::new(PIP_INSTALL, "Install Python packages using pip.", RiskTier::Moderate)
        .with_parameter(ToolParameter::new(
            "packages",
            "Space-separated Python package names.",
            true,
        ))
}

pub fn pip_list_definition() -> ToolDefinition {
    ToolDefinition::new(PIP_LIST, "List installed Python packages.", RiskTier::Safe)
        .with_parameter(ToolParameter::new(
            "filter",
            "Optional filter to search package names.",
            false,
        ))
}

/// First package manager found on `PATH`; `pkg` when none is.
pub fn detect_package_manager() -> &'static str {
    PACKAGE_MANAGERS
        .into_iter()
        .find(|mgr| which::which(mgr).is_ok())
        .unwrap_or(PACKAGE_MANAGERS[0])
}

fn package_names<'a>(tool: &str, call: &'a ToolCall) -> Result<Vec<&'a str>, ToolResult> {
    let raw = call
        .require_string("packages")
        .map_err(|e| ToolResult::failure(tool, ToolError::invalid_argument(e)))?;
    let names: Vec<&str> = raw.split_whitespace().collect();
    if names.is_empty() {
        return Err(ToolResult::failure(
            tool,
            ToolError::invalid_argument("No package names given"),
        ));
    }
    Ok(names)
}

/// Keep the lines of `text` containing `filter`, case-insensitively.
fn filter_lines(text: &str, filter: &str) -> String {
    let needle = filter.to_lowercase();
    text.lines()
        .filter(|line| line.to_lowercase().contains(&needle))
        .map(|line| format!("{}\n", line))
        .collect()
}

async fn manage(
    tool: &str,
    program: &str,
    subcommand: &[&str],
    call: &ToolCall,
    timeout: Duration,
) -> ToolResult {
    let names = match package_names(tool, call) {
        Ok(n) => n,
        Err(r) => return r,
    };
    let job = ProcessJob::new(program, timeout)
        .args(subcommand.iter().copied())
        .args(names);
    render_sectioned(tool, process::run(job).await)
}

/// List through `program`, optionally keeping only matching stdout lines.
///
/// With a filter, stderr is dropped.
async fn list(
    tool: &str,
    program: &str,
    subcommand: &[&str],
    call: &ToolCall,
    timeout: Duration,
) -> ToolResult {
    let job = ProcessJob::new(program, timeout).args(subcommand.iter().copied());
    let outcome = process::run(job).await.map(|mut out| {
        if let Some(filter) = call.get_string("filter").filter(|f| !f.is_empty()) {
            out.stdout = filter_lines(&out.stdout, filter);
            out.stderr.clear();
        }
        out
    });
    render_sectioned(tool, outcome)
}

pub async fn execute_pkg_install(call: &ToolCall) -> ToolResult {
    let mgr = detect_package_manager();
    manage(PKG_INSTALL, mgr, &["install", "-y"], call, INSTALL_TIMEOUT).await
}

pub async fn execute_pkg_uninstall(call: &ToolCall) -> ToolResult {
    let mgr = detect_package_manager();
    manage(PKG_UNINSTALL, mgr, &["remove", "-y"], call, UNINSTALL_TIMEOUT).await
}

pub async fn execute_pkg_list(call: &ToolCall, timeout: Duration) -> ToolResult {
    let mgr = detect_package_manager();
    list(PKG_LIST, mgr, &["list", "--installed"], call, timeout).await
}

pub async fn execute_pip_install(call: &ToolCall) -> ToolResult {
    manage(PIP_INSTALL, PYTHON, &["-m", "pip", "install"], call, INSTALL_TIMEOUT).await
}

pub async fn execute_pip_list(call: &ToolCall, timeout: Duration) -> ToolResult {
    list(PIP_LIST, PYTHON, &["-m", "pip", "list"], call, timeout).await
}
