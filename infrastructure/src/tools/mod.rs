//! Tool implementations for the agent
//!
//! Every tool the model can call is a [`BuiltinTool`] variant. The set is
//! closed: [`default_registry`] lists them in the order the model sees them,
//! and [`LocalToolExecutor`] routes calls by matching on the variant.
//!
//! ## Groups
//!
//! - `command`: run_command, python_exec
//! - `file`: read/write/append, list_directory, delete/move/copy
//! - `search`: search_files, search_in_files
//! - `system`: get_system_info
//! - `web`: fetch_url, web_search
//! - `package`: pkg_* and pip_*
//! - `termux`: Android device tools via Termux:API

pub mod command;
pub mod file;
pub mod package;
pub mod search;
pub mod system;
pub mod termux;
pub mod web;

mod executor;
mod process;
mod schema;

pub use executor::LocalToolExecutor;
pub use schema::OllamaToolSchema;
pub use termux::TermuxTool;

use termagent_domain::tool::{entities::ToolDefinition, registry::ToolRegistry};

/// A built-in tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTool {
    RunCommand,
    ReadFile,
    WriteFile,
    AppendFile,
    ListDirectory,
    SearchFiles,
    SearchInFiles,
    GetSystemInfo,
    FetchUrl,
    PythonExec,
    WebSearch,
    PkgInstall,
    PkgUninstall,
    PkgList,
    PipInstall,
    PipList,
    DeleteFile,
    MoveFile,
    CopyFile,
    Termux(TermuxTool),
}

/// Non-device tools, in catalog order
const CORE_TOOLS: [BuiltinTool; 19] = [
    BuiltinTool::RunCommand,
    BuiltinTool::ReadFile,
    BuiltinTool::WriteFile,
    BuiltinTool::AppendFile,
    BuiltinTool::ListDirectory,
    BuiltinTool::SearchFiles,
    BuiltinTool::SearchInFiles,
    BuiltinTool::GetSystemInfo,
    BuiltinTool::FetchUrl,
    BuiltinTool::PythonExec,
    BuiltinTool::WebSearch,
    BuiltinTool::PkgInstall,
    BuiltinTool::PkgUninstall,
    BuiltinTool::PkgList,
    BuiltinTool::PipInstall,
    BuiltinTool::PipList,
    BuiltinTool::DeleteFile,
    BuiltinTool::MoveFile,
    BuiltinTool::CopyFile,
];

impl BuiltinTool {
    /// All tools in catalog order.
    pub fn all() -> impl Iterator<Item = BuiltinTool> {
        CORE_TOOLS
            .into_iter()
            .chain(TermuxTool::ALL.into_iter().map(BuiltinTool::Termux))
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinTool::RunCommand => command::RUN_COMMAND,
            BuiltinTool::ReadFile => file::READ_FILE,
            BuiltinTool::WriteFile => file::WRITE_FILE,
            BuiltinTool::AppendFile => file::APPEND_FILE,
            BuiltinTool::ListDirectory => file::LIST_DIRECTORY,
            BuiltinTool::SearchFiles => search::SEARCH_FILES,
            BuiltinTool::SearchInFiles => search::SEARCH_IN_FILES,
            BuiltinTool::GetSystemInfo => system::GET_SYSTEM_INFO,
            BuiltinTool::FetchUrl => web::fetch::FETCH_URL,
            BuiltinTool::PythonExec => command::PYTHON_EXEC,
            BuiltinTool::WebSearch => web::search::WEB_SEARCH,
            BuiltinTool::PkgInstall => package::PKG_INSTALL,
            BuiltinTool::PkgUninstall => package::PKG_UNINSTALL,
            BuiltinTool::PkgList => package::PKG_LIST,
            BuiltinTool::PipInstall => package::PIP_INSTALL,
            BuiltinTool::PipList => package::PIP_LIST,
            BuiltinTool::DeleteFile => file::DELETE_FILE,
            BuiltinTool::MoveFile => file::MOVE_FILE,
            BuiltinTool::CopyFile => file::COPY_FILE,
            BuiltinTool::Termux(t) => t.name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|t| t.name() == name)
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            BuiltinTool::RunCommand => command::run_command_definition(),
            BuiltinTool::ReadFile => file::read_file_definition(),
            BuiltinTool::WriteFile => file::write_file_definition(),
            BuiltinTool::AppendFile => file::append_file_definition(),
            BuiltinTool::ListDirectory => file::list_directory_definition(),
            BuiltinTool::SearchFiles => search::search_files_definition(),
            BuiltinTool::SearchInFiles => search::search_in_files_definition(),
            BuiltinTool::GetSystemInfo => system::get_system_info_definition(),
            BuiltinTool::FetchUrl => web::fetch::fetch_url_definition(),
            BuiltinTool::PythonExec => command::python_exec_definition(),
            BuiltinTool::WebSearch => web::search::web_search_definition(),
            BuiltinTool::PkgInstall => package::pkg_install_definition(),
            BuiltinTool::PkgUninstall => package::pkg_uninstall_definition(),
            BuiltinTool::PkgList => package::pkg_list_definition(),
            BuiltinTool::PipInstall => package::pip_install_definition(),
            BuiltinTool::PipList => package::pip_list_definition(),
            BuiltinTool::DeleteFile => file::delete_file_definition(),
            BuiltinTool::MoveFile => file::move_file_definition(),
            BuiltinTool::CopyFile => file::copy_file_definition(),
            BuiltinTool::Termux(t) => t.definition(),
        }
    }
}

/// Registry of every built-in tool, in catalog order.
pub fn default_registry() -> ToolRegistry {
    BuiltinTool::all().fold(ToolRegistry::new(), |registry, tool| {
        registry.register(tool.definition())
    })
}
