//! File tools: read_file, write_file, append_file, list_directory,
//! delete_file, move_file, copy_file
//!
//! All paths go through [`expand_home`] first, so `~/notes.txt` works.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use termagent_domain::tool::{
    entities::{RiskTier, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const APPEND_FILE: &str = "append_file";
pub const LIST_DIRECTORY: &str = "list_directory";
pub const DELETE_FILE: &str = "delete_file";
pub const MOVE_FILE: &str = "move_file";
pub const COPY_FILE: &str = "copy_file";

/// Default recursion depth of `list_directory`
const DEFAULT_MAX_DEPTH: usize = 3;

/// Entries after which a recursive listing stops
const MAX_LISTING_ENTRIES: usize = 500;

// ==================== Definitions ====================

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a file and return it as text. \
         Supports optional line range to read only part of the file.",
        RiskTier::Safe,
    )
    .with_parameter(
        ToolParameter::new("path", "Absolute or relative path to the file.", true)
            .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("start_line", "Optional 1-based start line.", false)
            .with_type("integer"),
    )
    .with_parameter(
        ToolParameter::new("end_line", "Optional 1-based end line (inclusive).", false)
            .with_type("integer"),
    )
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Create or overwrite a file with the given content. \
         Parent directories are created automatically.",
        RiskTier::Moderate,
    )
    .with_parameter(ToolParameter::new("path", "Path to the file to write.", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to write to the file.", true))
}

pub fn append_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        APPEND_FILE,
        "Append content to the end of an existing file.",
        RiskTier::Moderate,
    )
    .with_parameter(ToolParameter::new("path", "Path to the file.", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to append.", true))
}

pub fn list_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_DIRECTORY,
        "List files and directories in the given path. \
         Returns names, types (file/dir), and sizes.",
        RiskTier::Safe,
    )
    .with_parameter(
        ToolParameter::new("path", "Directory path to list. Defaults to '.'", false)
            .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("recursive", "If true, list recursively. Default false.", false)
            .with_type("boolean"),
    )
    .with_parameter(
        ToolParameter::new("max_depth", "Max recursion depth (default 3).", false)
            .with_type("integer"),
    )
}

pub fn delete_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        DELETE_FILE,
        "Delete a file or directory. DANGEROUS: always asks for confirmation. \
         Use recursive=true for directories.",
        RiskTier::Dangerous,
    )
    .with_parameter(
        ToolParameter::new("path", "Path to file or directory to delete.", true).with_type("path"),
    )
    .with_parameter(
        ToolParameter::new(
            "recursive",
            "If true, delete directory recursively. Default false.",
            false,
        )
        .with_type("boolean"),
    )
}

pub fn move_file_definition() -> ToolDefinition {
    ToolDefinition::new(MOVE_FILE, "Move or rename a file or directory.", RiskTier::Moderate)
        .with_parameter(ToolParameter::new("source", "Source path.", true).with_type("path"))
        .with_parameter(
            ToolParameter::new("destination", "Destination path.", true).with_type("path"),
        )
}

pub fn copy_file_definition() -> ToolDefinition {
    ToolDefinition::new(COPY_FILE, "Copy a file or directory.", RiskTier::Moderate)
        .with_parameter(ToolParameter::new("source", "Source path.", true).with_type("path"))
        .with_parameter(
            ToolParameter::new("destination", "Destination path.", true).with_type("path"),
        )
}

// ==================== Helpers ====================

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Human-readable size: `512 B`, `1.5 KB`, `3.0 MB`, ...
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    for unit in ["KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

fn io_failure(tool: &str, e: std::io::Error) -> ToolResult {
    ToolResult::failure(tool, ToolError::execution_failed(e.to_string()))
}

fn required<'a>(tool: &str, call: &'a ToolCall, key: &str) -> Result<&'a str, ToolResult> {
    call.require_string(key)
        .map_err(|e| ToolResult::failure(tool, ToolError::invalid_argument(e)))
}

// ==================== Read / write ====================

/// Execute the read_file tool
///
/// Output starts with `[N lines]`, or `[Lines s-e of N]` when a range was
/// requested. Invalid UTF-8 is replaced rather than rejected.
pub fn execute_read_file(call: &ToolCall) -> ToolResult {
    let path = match required(READ_FILE, call, "path") {
        Ok(p) => expand_home(p),
        Err(r) => return r,
    };

    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::not_found(format!("File not found: {}", path.display())),
            );
        }
        Err(_) if path.is_dir() => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::invalid_argument(format!("Is a directory: {}", path.display())),
            );
        }
        Err(e) => return io_failure(READ_FILE, e),
    };
    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let total = lines.len();

    // zero counts as "not given"
    let start = call.get_i64("start_line").filter(|n| *n != 0);
    let end = call.get_i64("end_line").filter(|n| *n != 0);

    let output = if start.is_some() || end.is_some() {
        let s = start.unwrap_or(1).max(1) as usize - 1;
        let e = end.map_or(total, |e| (e.max(0) as usize).min(total));
        let body = if s < e { lines[s..e].concat() } else { String::new() };
        format!("[Lines {}-{} of {}]\n{}", s + 1, e, total, body)
    } else {
        format!("[{} lines]\n{}", total, content)
    };

    ToolResult::success(READ_FILE, output)
}

/// Execute the write_file tool
pub fn execute_write_file(call: &ToolCall) -> ToolResult {
    let (path, content) = match (
        required(WRITE_FILE, call, "path"),
        required(WRITE_FILE, call, "content"),
    ) {
        (Ok(p), Ok(c)) => (expand_home(p), c),
        (Err(r), _) | (_, Err(r)) => return r,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return io_failure(WRITE_FILE, e);
    }

    match fs::write(&path, content) {
        Ok(()) => ToolResult::success(
            WRITE_FILE,
            format!(
                "Successfully wrote {} chars to {}",
                content.chars().count(),
                path.display()
            ),
        ),
        Err(e) => io_failure(WRITE_FILE, e),
    }
}

/// Execute the append_file tool (creates the file when missing)
pub fn execute_append_file(call: &ToolCall) -> ToolResult {
    let (path, content) = match (
        required(APPEND_FILE, call, "path"),
        required(APPEND_FILE, call, "content"),
    ) {
        (Ok(p), Ok(c)) => (expand_home(p), c),
        (Err(r), _) | (_, Err(r)) => return r,
    };

    let appended = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(content.as_bytes()));

    match appended {
        Ok(()) => ToolResult::success(
            APPEND_FILE,
            format!(
                "Successfully appended {} chars to {}",
                content.chars().count(),
                path.display()
            ),
        ),
        Err(e) => io_failure(APPEND_FILE, e),
    }
}

// ==================== Listing ====================

/// Execute the list_directory tool
pub fn execute_list_directory(call: &ToolCall) -> ToolResult {
    let raw = call
        .get_string("path")
        .filter(|p| !p.is_empty())
        .unwrap_or(".");
    let path = expand_home(raw);

    if !path.exists() {
        return ToolResult::failure(
            LIST_DIRECTORY,
            ToolError::not_found(format!("Directory not found: {}", path.display())),
        );
    }
    if !path.is_dir() {
        return ToolResult::failure(
            LIST_DIRECTORY,
            ToolError::invalid_argument(format!("Not a directory: {}", path.display())),
        );
    }

    let entries = if call.get_bool("recursive").unwrap_or(false) {
        let max_depth = call
            .get_i64("max_depth")
            .filter(|d| *d > 0)
            .map_or(DEFAULT_MAX_DEPTH, |d| d as usize);
        let mut entries = Vec::new();
        walk(&path, 0, max_depth, &mut entries);
        entries
    } else {
        match read_sorted(&path) {
            Ok(items) => items
                .into_iter()
                .map(|(name, item)| match item {
                    Entry::Dir => format!("📁 {}/", name),
                    Entry::File(size) => format!("📄 {}  ({})", name, format_size(size)),
                })
                .collect(),
            Err(e) => return io_failure(LIST_DIRECTORY, e),
        }
    };

    if entries.is_empty() {
        ToolResult::success(LIST_DIRECTORY, "(empty directory)")
    } else {
        ToolResult::success(LIST_DIRECTORY, entries.join("\n"))
    }
}

enum Entry {
    Dir,
    File(u64),
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<(String, Entry)>> {
    let mut items: Vec<(String, Entry)> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let kind = if entry.path().is_dir() {
                Entry::Dir
            } else {
                Entry::File(entry.metadata().map(|m| m.len()).unwrap_or(0))
            };
            (name, kind)
        })
        .collect();
    items.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(items)
}

/// Depth-first listing: each directory, then its files, then its subdirectories.
///
/// Returns `false` once the entry budget is exhausted.
fn walk(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<String>) -> bool {
    if depth >= max_depth {
        return true;
    }
    let indent = "  ".repeat(depth);
    let label = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    out.push(format!("{}📁 {}/", indent, label));

    // unreadable directories are listed without contents
    let items = read_sorted(dir).unwrap_or_default();
    let mut subdirs = Vec::new();
    for (name, item) in items {
        match item {
            Entry::Dir => subdirs.push(dir.join(name)),
            Entry::File(size) => {
                out.push(format!("{}  📄 {}  ({})", indent, name, format_size(size)))
            }
        }
    }
    if out.len() > MAX_LISTING_ENTRIES {
        out.push("... [truncated]".to_string());
        return false;
    }

    for sub in subdirs {
        if !walk(&sub, depth + 1, max_depth, out) {
            return false;
        }
    }
    true
}

// ==================== Delete / move / copy ====================

/// Execute the delete_file tool
pub fn execute_delete_file(call: &ToolCall) -> ToolResult {
    let path = match required(DELETE_FILE, call, "path") {
        Ok(p) => expand_home(p),
        Err(r) => return r,
    };
    let recursive = call.get_bool("recursive").unwrap_or(false);
    let shown = path.display();

    let outcome = if path.is_dir() {
        if recursive {
            fs::remove_dir_all(&path).map(|_| format!("Deleted directory (recursive): {}", shown))
        } else {
            fs::remove_dir(&path).map(|_| format!("Deleted empty directory: {}", shown))
        }
    } else if path.symlink_metadata().is_ok() {
        fs::remove_file(&path).map(|_| format!("Deleted file: {}", shown))
    } else {
        return ToolResult::failure(
            DELETE_FILE,
            ToolError::not_found(format!("Path not found: {}", shown)),
        );
    };

    match outcome {
        Ok(msg) => ToolResult::success(DELETE_FILE, msg),
        Err(e) => io_failure(DELETE_FILE, e),
    }
}

/// Target path when `destination` is an existing directory: move/copy *into* it.
fn resolve_destination(source: &Path, destination: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

/// Execute the move_file tool
///
/// Falls back to copy + remove when a plain rename fails (e.g. across
/// storage volumes).
pub fn execute_move_file(call: &ToolCall) -> ToolResult {
    let (source, destination) = match (
        required(MOVE_FILE, call, "source"),
        required(MOVE_FILE, call, "destination"),
    ) {
        (Ok(s), Ok(d)) => (expand_home(s), expand_home(d)),
        (Err(r), _) | (_, Err(r)) => return r,
    };

    if source.symlink_metadata().is_err() {
        return ToolResult::failure(
            MOVE_FILE,
            ToolError::not_found(format!("Path not found: {}", source.display())),
        );
    }

    let target = resolve_destination(&source, &destination);
    let moved = fs::rename(&source, &target).or_else(|_| {
        if source.is_dir() {
            copy_dir(&source, &target).and_then(|_| fs::remove_dir_all(&source))
        } else {
            fs::copy(&source, &target).and_then(|_| fs::remove_file(&source))
        }
    });

    match moved {
        Ok(()) => ToolResult::success(
            MOVE_FILE,
            format!("Moved: {} → {}", source.display(), destination.display()),
        ),
        Err(e) => io_failure(MOVE_FILE, e),
    }
}

/// Execute the copy_file tool
pub fn execute_copy_file(call: &ToolCall) -> ToolResult {
    let (source, destination) = match (
        required(COPY_FILE, call, "source"),
        required(COPY_FILE, call, "destination"),
    ) {
        (Ok(s), Ok(d)) => (expand_home(s), expand_home(d)),
        (Err(r), _) | (_, Err(r)) => return r,
    };

    let copied = if source.is_dir() {
        if destination.exists() {
            return ToolResult::failure(
                COPY_FILE,
                ToolError::invalid_argument(format!(
                    "Destination already exists: {}",
                    destination.display()
                )),
            );
        }
        copy_dir(&source, &destination)
    } else if source.exists() {
        let target = resolve_destination(&source, &destination);
        target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::copy(&source, &target).map(|_| ()))
    } else {
        return ToolResult::failure(
            COPY_FILE,
            ToolError::not_found(format!("Path not found: {}", source.display())),
        );
    };

    match copied {
        Ok(()) => ToolResult::success(
            COPY_FILE,
            format!("Copied: {} → {}", source.display(), destination.display()),
        ),
        Err(e) => io_failure(COPY_FILE, e),
    }
}

fn copy_dir(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
