//! Console output formatting for the agent REPL

use colored::Colorize;
use termagent_domain::{HistorySummary, RiskTier, ToolDefinition, ToolRegistry};

/// Inner width of the answer panel
const PANEL_WIDTH: usize = 72;

/// Formats agent output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Bordered panel around the final answer.
    ///
    /// Long lines are wrapped on whitespace to the panel width.
    pub fn answer_panel(answer: &str) -> String {
        let border = "─".repeat(PANEL_WIDTH + 2);
        let mut output = format!("{}\n", format!("╭{}╮", border).cyan());

        let body = if answer.trim().is_empty() {
            "(empty response)"
        } else {
            answer.trim_end()
        };
        for line in body.lines().flat_map(|l| wrap(l, PANEL_WIDTH)) {
            let pad = PANEL_WIDTH.saturating_sub(line.chars().count());
            output.push_str(&format!(
                "{} {}{} {}\n",
                "│".cyan(),
                line,
                " ".repeat(pad),
                "│".cyan()
            ));
        }

        output.push_str(&format!("{}", format!("╰{}╯", border).cyan()));
        output
    }

    /// `/tools` listing: `name(params)` then the description.
    pub fn tool_list(registry: &ToolRegistry) -> String {
        let mut output = format!("{}\n", format!("Available tools ({}):", registry.len()).bold());
        for tool in registry.describe() {
            output.push_str(&format!(
                "  {} {}\n      {}\n",
                Self::signature(tool).cyan(),
                Self::tier_tag(tool.risk_tier),
                tool.description.dimmed()
            ));
        }
        output
    }

    fn signature(tool: &ToolDefinition) -> String {
        format!("{}({})", tool.name, tool.parameter_names().join(", "))
    }

    fn tier_tag(tier: RiskTier) -> colored::ColoredString {
        let tag = format!("[{}]", tier.as_str());
        match tier {
            RiskTier::Safe => tag.green(),
            RiskTier::Moderate => tag.yellow(),
            RiskTier::Dangerous => tag.red().bold(),
        }
    }

    /// `/history` summary.
    pub fn history_summary(summary: &HistorySummary) -> String {
        format!(
            "{} {} messages, {} tool results, {} total entries",
            "History:".bold(),
            summary.dialogue,
            summary.tool_results,
            summary.total
        )
    }

    /// Render an error line
    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    /// Render a warning line
    pub fn warning(message: &str) -> String {
        format!("{} {}", "⚠".yellow(), message.yellow())
    }

    /// Render a success line
    pub fn success(message: &str) -> String {
        format!("{} {}", "✓".green(), message)
    }
}

/// Split `line` into chunks of at most `width` characters, on whitespace
/// where possible.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
        }
        if word_len > width {
            // hard-split words longer than a line
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(width) {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = chunk.iter().collect();
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_line_untouched() {
        assert_eq!(wrap("hello world", 20), vec!["hello world"]);
        assert_eq!(wrap("", 20), vec![""]);
    }

    #[test]
    fn test_wrap_on_whitespace() {
        let wrapped = wrap("alpha beta gamma delta", 11);
        assert_eq!(wrapped, vec!["alpha beta", "gamma delta"]);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 11));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let wrapped = wrap("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_answer_panel_contains_every_line() {
        colored::control::set_override(false);
        let panel = ConsoleFormatter::answer_panel("Here are the files.\nDone.");
        let lines: Vec<&str> = panel.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('╭'));
        assert!(lines[1].contains("Here are the files."));
        assert!(lines[2].contains("Done."));
        assert!(lines[3].starts_with('╰'));
        assert_eq!(lines[1].chars().count(), lines[0].chars().count());
    }

    #[test]
    fn test_tool_list_shows_signatures() {
        colored::control::set_override(false);
        let registry = ToolRegistry::new().register(
            ToolDefinition::new("read_file", "Read a file.", RiskTier::Safe).with_parameter(
                termagent_domain::ToolParameter::new("path", "File path", true),
            ),
        );
        let listing = ConsoleFormatter::tool_list(&registry);
        assert!(listing.contains("Available tools (1):"));
        assert!(listing.contains("read_file(path) [safe]"));
        assert!(listing.contains("Read a file."));
    }

    #[test]
    fn test_history_summary() {
        colored::control::set_override(false);
        let summary = HistorySummary {
            dialogue: 4,
            tool_results: 2,
            total: 7,
        };
        assert_eq!(
            ConsoleFormatter::history_summary(&summary),
            "History: 4 messages, 2 tool results, 7 total entries"
        );
    }
}
