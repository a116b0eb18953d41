//! System information tool: get_system_info

use super::process::{self, ProcessJob};
use std::time::Duration;
use termagent_domain::tool::{
    entities::{RiskTier, ToolDefinition},
    value_objects::ToolResult,
};

/// Tool name constant
pub const GET_SYSTEM_INFO: &str = "get_system_info";

const DF_TIMEOUT: Duration = Duration::from_secs(5);

pub fn get_system_info_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_SYSTEM_INFO,
        "Get system information: OS, architecture, kernel, disk usage, memory, \
         current directory and user.",
        RiskTier::Safe,
    )
}

/// Execute the get_system_info tool
///
/// Disk and memory figures are best effort: a missing `df` or
/// `/proc/meminfo` just leaves them out.
pub async fn execute_get_system_info() -> ToolResult {
    let mut info: Vec<(String, String)> = vec![
        ("os".into(), std::env::consts::OS.into()),
        ("os_family".into(), std::env::consts::FAMILY.into()),
        ("architecture".into(), std::env::consts::ARCH.into()),
    ];

    if let Ok(release) = std::fs::read_to_string("/proc/sys/kernel/osrelease") {
        info.push(("kernel".into(), release.trim().to_string()));
    }
    if let Ok(cwd) = std::env::current_dir() {
        info.push(("current_directory".into(), cwd.display().to_string()));
    }
    if let Some(home) = dirs::home_dir() {
        info.push(("home_directory".into(), home.display().to_string()));
    }
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    info.push(("user".into(), user));
    info.push(("termagent_version".into(), env!("CARGO_PKG_VERSION").into()));

    info.extend(disk_usage().await);
    if let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") {
        info.extend(parse_meminfo(&meminfo));
    }

    let lines: Vec<String> = info.iter().map(|(k, v)| format!("  {}: {}", k, v)).collect();
    ToolResult::success(
        GET_SYSTEM_INFO,
        format!("System Information:\n{}", lines.join("\n")),
    )
}

/// Size/used/available of the root filesystem, from `df -h /`.
async fn disk_usage() -> Vec<(String, String)> {
    let Ok(out) = process::run(ProcessJob::new("df", DF_TIMEOUT).args(["-h", "/"])).await else {
        return Vec::new();
    };
    if !out.success() {
        return Vec::new();
    }
    parse_df(&out.stdout)
}

fn parse_df(stdout: &str) -> Vec<(String, String)> {
    // Filesystem Size Used Avail Use% Mounted
    let Some(row) = stdout.lines().nth(1) else {
        return Vec::new();
    };
    let cols: Vec<&str> = row.split_whitespace().collect();
    if cols.len() < 4 {
        return Vec::new();
    }
    vec![
        ("disk_total".into(), cols[1].into()),
        ("disk_used".into(), cols[2].into()),
        ("disk_free".into(), cols[3].into()),
    ]
}

fn parse_meminfo(meminfo: &str) -> Vec<(String, String)> {
    meminfo
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(key, _)| matches!(*key, "MemTotal" | "MemAvailable" | "MemFree"))
        .map(|(key, value)| (key.to_string(), value.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_df() {
        let stdout = "Filesystem      Size  Used Avail Use% Mounted on\n\
                      /dev/root        59G   41G   18G  70% /\n";
        let parsed = parse_df(stdout);
        assert_eq!(parsed[0], ("disk_total".to_string(), "59G".to_string()));
        assert_eq!(parsed[2], ("disk_free".to_string(), "18G".to_string()));
        assert!(parse_df("garbage").is_empty());
    }

    #[test]
    fn test_parse_meminfo() {
        let meminfo = "MemTotal:        7869040 kB\nMemFree:          312344 kB\n\
                       MemAvailable:    3125460 kB\nBuffers:           12345 kB\n";
        let parsed = parse_meminfo(meminfo);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], ("MemTotal".to_string(), "7869040 kB".to_string()));
    }

    #[tokio::test]
    async fn test_system_info_header() {
        let text = execute_get_system_info().await.into_text();
        assert!(text.starts_with("System Information:\n"));
        assert!(text.contains(&format!("  os: {}", std::env::consts::OS)));
    }
}
