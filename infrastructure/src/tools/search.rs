//! Search tools: search_files (glob on names), search_in_files (grep on contents)

use super::file::expand_home;
use glob::{Pattern, glob};
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use termagent_domain::tool::{
    entities::{RiskTier, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

/// Tool name constants
pub const SEARCH_FILES: &str = "search_files";
pub const SEARCH_IN_FILES: &str = "search_in_files";

/// Paths printed by `search_files`
const MAX_LISTED_FILES: usize = 200;

/// Matching lines returned by `search_in_files`
const MAX_MATCHES: usize = 100;

/// Files larger than this are skipped by `search_in_files` (5 MB)
const MAX_GREP_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub fn search_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_FILES,
        "Search for files by name pattern (glob) in a directory tree.",
        RiskTier::Safe,
    )
    .with_parameter(ToolParameter::new(
        "pattern",
        "Glob pattern, e.g. '*.py' or '**/*.json'.",
        true,
    ))
    .with_parameter(
        ToolParameter::new("directory", "Root directory to search from. Default '.'", false)
            .with_type("path"),
    )
}

pub fn search_in_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_IN_FILES,
        "Search for a text pattern inside files (like grep). \
         Returns matching lines with file paths and line numbers.",
        RiskTier::Safe,
    )
    .with_parameter(ToolParameter::new(
        "query",
        "Text or regex pattern to search for.",
        true,
    ))
    .with_parameter(
        ToolParameter::new("directory", "Directory to search in. Default '.'", false)
            .with_type("path"),
    )
    .with_parameter(ToolParameter::new(
        "file_pattern",
        "Optional glob to filter files, e.g. '*.py'.",
        false,
    ))
    .with_parameter(
        ToolParameter::new("case_sensitive", "Case-sensitive search. Default true.", false)
            .with_type("boolean"),
    )
}

fn directory_arg(call: &ToolCall) -> (String, PathBuf) {
    let raw = call
        .get_string("directory")
        .filter(|d| !d.is_empty())
        .unwrap_or(".");
    let path = expand_home(raw);
    (path.display().to_string(), path)
}

/// Execute the search_files tool
pub fn execute_search_files(call: &ToolCall) -> ToolResult {
    let pattern = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(SEARCH_FILES, ToolError::invalid_argument(e)),
    };
    let (shown, directory) = directory_arg(call);

    let full_pattern = directory.join(pattern);
    let entries = match glob(&full_pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(e) => {
            return ToolResult::failure(
                SEARCH_FILES,
                ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)),
            );
        }
    };

    // unreadable paths are skipped
    let matches: Vec<String> = entries
        .flatten()
        .map(|p| p.display().to_string())
        .collect();

    if matches.is_empty() {
        return ToolResult::success(
            SEARCH_FILES,
            format!("No files matching '{}' in {}", pattern, shown),
        );
    }

    let mut output = format!("Found {} match(es):\n", matches.len());
    for m in matches.iter().take(MAX_LISTED_FILES) {
        output.push_str(&format!("  {}\n", m));
    }
    if matches.len() > MAX_LISTED_FILES {
        output.push_str(&format!("  ... and {} more", matches.len() - MAX_LISTED_FILES));
    }
    ToolResult::success(SEARCH_FILES, output)
}

/// Build the matcher: the query as a regex, or as a literal when it is not
/// a valid regex.
fn build_matcher(query: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(query)
        .case_insensitive(!case_sensitive)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(query))
                .case_insensitive(!case_sensitive)
                .build()
        })
}

/// Execute the search_in_files tool
pub fn execute_search_in_files(call: &ToolCall) -> ToolResult {
    let query = match call.require_string("query") {
        Ok(q) => q,
        Err(e) => return ToolResult::failure(SEARCH_IN_FILES, ToolError::invalid_argument(e)),
    };
    let (shown, directory) = directory_arg(call);
    let case_sensitive = call.get_bool("case_sensitive").unwrap_or(true);

    if !directory.exists() {
        return ToolResult::failure(
            SEARCH_IN_FILES,
            ToolError::not_found(format!("Directory not found: {}", shown)),
        );
    }

    let file_filter = match call.get_string("file_pattern").filter(|p| !p.is_empty()) {
        Some(p) => match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                return ToolResult::failure(
                    SEARCH_IN_FILES,
                    ToolError::invalid_argument(format!("Invalid file pattern: {}", e)),
                );
            }
        },
        None => None,
    };

    let matcher = match build_matcher(query, case_sensitive) {
        Ok(r) => r,
        Err(e) => {
            return ToolResult::failure(
                SEARCH_IN_FILES,
                ToolError::invalid_argument(format!("Invalid search pattern: {}", e)),
            );
        }
    };

    let files = if directory.is_file() {
        vec![directory.clone()]
    } else {
        collect_files(&directory, file_filter.as_ref())
    };

    let mut matches = Vec::new();
    'files: for path in files {
        if fs::metadata(&path).map_or(true, |m| m.len() > MAX_GREP_FILE_SIZE) {
            continue;
        }
        let Ok(bytes) = fs::read(&path) else {
            continue;
        };
        let content = String::from_utf8_lossy(&bytes);
        for (idx, line) in content.lines().enumerate() {
            if matcher.is_match(line) {
                matches.push(format!("{}:{}: {}", path.display(), idx + 1, line.trim_end()));
                if matches.len() >= MAX_MATCHES {
                    break 'files;
                }
            }
        }
    }

    if matches.is_empty() {
        return ToolResult::success(
            SEARCH_IN_FILES,
            format!("No matches for '{}' in {}", query, shown),
        );
    }

    let mut output = matches.join("\n");
    if matches.len() >= MAX_MATCHES {
        output.push_str(&format!("\n... (limited to {} matches)", MAX_MATCHES));
    }
    ToolResult::success(SEARCH_IN_FILES, output)
}

/// Every regular file under `dir`, filtered by file name.
fn collect_files(dir: &Path, file_filter: Option<&Pattern>) -> Vec<PathBuf> {
    let pattern = dir.join("**").join("*");
    let Ok(paths) = glob(&pattern.to_string_lossy()) else {
        return Vec::new();
    };
    paths
        .flatten()
        .filter(|p| p.is_file())
        .filter(|p| match (file_filter, p.file_name()) {
            (Some(filter), Some(name)) => filter.matches(&name.to_string_lossy()),
            (Some(_), None) => false,
            (None, _) => true,
        })
        .collect()
}
