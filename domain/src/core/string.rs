//! String utilities for the domain layer.

/// Shorten `s` to at most `max_len` bytes, ending in `...` (UTF-8 safe).
///
/// Used for one-line previews, not for model-facing output.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Marker appended to output cut at `max_chars`; names the original length.
pub fn truncation_marker(total_chars: usize) -> String {
    format!("\n\n... [truncated, {} total chars]", total_chars)
}

/// Cap `text` at `max_chars` characters.
///
/// Text within budget is returned unchanged. Longer text keeps its first
/// `max_chars` characters followed by [`truncation_marker`].
pub fn truncate_output(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(&truncation_marker(total));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate("short", 300), "short");
        assert_eq!(truncate("abcdefghij", 7), "abcd...");
    }

    #[test]
    fn test_truncate_preview_respects_char_boundaries() {
        // "é" is two bytes; a cut at byte 3 would split the second one
        assert_eq!(truncate("éééé", 6), "é...");
    }

    #[test]
    fn test_output_within_budget_unchanged() {
        assert_eq!(truncate_output("hello", 5), "hello");
        assert_eq!(truncate_output("", 0), "");
    }

    #[test]
    fn test_output_over_budget_has_exact_length() {
        let text = "x".repeat(15_050);
        let out = truncate_output(&text, 15_000);
        let marker = truncation_marker(15_050);
        assert!(out.ends_with(&marker));
        assert_eq!(out.chars().count(), 15_000 + marker.chars().count());
        assert!(marker.contains("15050 total chars"));
    }

    #[test]
    fn test_output_counts_chars_not_bytes() {
        let text = "📁".repeat(12);
        let out = truncate_output(&text, 10);
        assert!(out.starts_with(&"📁".repeat(10)));
        assert!(out.ends_with("[truncated, 12 total chars]"));
    }
}
