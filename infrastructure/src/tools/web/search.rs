//! `web_search` tool — web search through DuckDuckGo's HTML endpoint.
//!
//! No API key is needed. The results page is parsed with `scraper`; each
//! `.result` block yields a title, a target URL and a snippet. Result links
//! point at a DuckDuckGo redirect whose `uddg` query parameter holds the
//! real URL, which is unwrapped.
//!
//! # Output Format
//!
//! ```text
//! Search results for: rust async
//!
//! 1. Asynchronous Programming in Rust
//!    URL: https://rust-lang.github.io/async-book/
//!    Snippet text...
//! ```

use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use termagent_domain::tool::{
    entities::{RiskTier, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

/// Canonical tool name for the web search tool.
pub const WEB_SEARCH: &str = "web_search";

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// The HTML endpoint serves reduced markup to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_RESULTS: usize = 5;
const MAX_RESULTS: usize = 15;

pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Search the web using DuckDuckGo and return results with titles, URLs, and snippets. \
         Use this when you need to look up information, find documentation, or answer \
         questions about current events.",
        RiskTier::Safe,
    )
    .with_parameter(ToolParameter::new("query", "The search query.", true))
    .with_parameter(
        ToolParameter::new(
            "num_results",
            "Number of results to return (default 5, max 15).",
            false,
        )
        .with_type("integer"),
    )
}

/// One parsed search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Execute the `web_search` tool
pub async fn execute_web_search(client: &reqwest::Client, call: &ToolCall) -> ToolResult {
    let query = match call.require_string("query") {
        Ok(q) => q,
        Err(e) => return ToolResult::failure(WEB_SEARCH, ToolError::invalid_argument(e)),
    };
    let limit = call
        .get_i64("num_results")
        .filter(|n| *n > 0)
        .map_or(DEFAULT_RESULTS, |n| n as usize)
        .min(MAX_RESULTS);

    let html = match fetch_results_page(client, query).await {
        Ok(html) => html,
        Err(e) => {
            return ToolResult::failure(
                WEB_SEARCH,
                ToolError::execution_failed(format!("Web search failed: {}", e)),
            );
        }
    };

    let hits = parse_results(&html, limit);
    if hits.is_empty() {
        return ToolResult::success(
            WEB_SEARCH,
            format!("No search results found for: {}", query),
        );
    }

    let body: Vec<String> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "{}. {}\n   URL: {}\n   {}\n",
                i + 1,
                hit.title,
                hit.url,
                hit.snippet
            )
        })
        .collect();
    ToolResult::success(
        WEB_SEARCH,
        format!("Search results for: {}\n\n{}", query, body.join("\n")),
    )
}

async fn fetch_results_page(client: &reqwest::Client, query: &str) -> reqwest::Result<String> {
    client
        .get(DDG_HTML_URL)
        .query(&[("q", query)])
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(SEARCH_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Extract up to `limit` hits from a DuckDuckGo HTML results page.
///
/// Ads (`.result--ad`) are skipped.
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let (Ok(block_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse(".result:not(.result--ad)"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&block_sel)
        .filter_map(|block| {
            let link = block.select(&link_sel).next()?;
            let href = link.value().attr("href")?;
            let snippet = block
                .select(&snippet_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();
            Some(SearchHit {
                title: element_text(link),
                url: unwrap_redirect(href),
                snippet,
            })
        })
        .take(limit)
        .collect()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=..` → `https://example.com`
fn unwrap_redirect(href: &str) -> String {
    let Ok(base) = reqwest::Url::parse("https://duckduckgo.com/") else {
        return href.to_string();
    };
    base.join(href)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
          <div class="result results_links result--ad">
            <a class="result__a" href="https://ads.example/">Sponsored</a>
          </div>
          <div class="result results_links">
            <h2 class="result__title">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">
                Rust <b>Programming</b> Language
              </a>
            </h2>
            <a class="result__snippet" href="#">A language empowering everyone.</a>
          </div>
          <div class="result results_links">
            <a class="result__a" href="https://doc.rust-lang.org/book/">The Book</a>
          </div>
          <div class="result results_links">
            <a class="result__a" href="https://crates.io/">crates.io</a>
            <a class="result__snippet">Package registry.</a>
          </div>
        </body></html>
    "##;

    #[test]
    fn test_parse_results_unwraps_redirects_and_skips_ads() {
        let hits = parse_results(PAGE, 10);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Rust Programming Language");
        assert_eq!(hits[0].url, "https://www.rust-lang.org/");
        assert_eq!(hits[0].snippet, "A language empowering everyone.");
        assert_eq!(hits[1].url, "https://doc.rust-lang.org/book/");
        assert_eq!(hits[1].snippet, "");
    }

    #[test]
    fn test_parse_results_respects_limit() {
        assert_eq!(parse_results(PAGE, 1).len(), 1);
        assert!(parse_results("<html></html>", 5).is_empty());
    }

    #[test]
    fn test_unwrap_redirect_passthrough() {
        assert_eq!(unwrap_redirect("https://example.com/a"), "https://example.com/a");
    }
}
