//! `fetch_url` tool — plain HTTP GET.
//!
//! # Output Format
//!
//! ```text
//! Status: 200
//! Content-Type: application/json
//!
//! {
//!   "pretty": "printed when the body is JSON"
//! }
//! ```
//!
//! Non-2xx responses are still successful tool runs: the status line tells
//! the model what happened.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use termagent_domain::tool::{
    entities::{RiskTier, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

/// Canonical tool name for the fetch tool.
pub const FETCH_URL: &str = "fetch_url";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub fn fetch_url_definition() -> ToolDefinition {
    ToolDefinition::new(
        FETCH_URL,
        "Fetch content from a URL via HTTP GET. \
         Returns the response body as text (useful for APIs, web pages).",
        RiskTier::Safe,
    )
    .with_parameter(ToolParameter::new("url", "The URL to fetch.", true))
    .with_parameter(
        ToolParameter::new("headers", "Optional HTTP headers as key-value pairs.", false)
            .with_type("object"),
    )
}

/// Headers from the `headers` argument; entries that are not valid HTTP
/// header names or string values are skipped.
fn parse_headers(call: &ToolCall) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(serde_json::Value::Object(map)) = call.arguments.get("headers") {
        for (key, value) in map {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                headers.insert(name, value);
            }
        }
    }
    headers
}

/// Execute the `fetch_url` tool
pub async fn execute_fetch_url(client: &reqwest::Client, call: &ToolCall) -> ToolResult {
    let url = match call.require_string("url") {
        Ok(u) => u,
        Err(e) => return ToolResult::failure(FETCH_URL, ToolError::invalid_argument(e)),
    };

    let response = match client
        .get(url)
        .headers(parse_headers(call))
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) if e.is_timeout() => {
            return ToolResult::failure(
                FETCH_URL,
                ToolError::timeout(format!(
                    "Request timed out ({}s).",
                    FETCH_TIMEOUT.as_secs()
                )),
            );
        }
        Err(e) if e.is_connect() => {
            return ToolResult::failure(
                FETCH_URL,
                ToolError::execution_failed(format!("Could not connect to {}", url)),
            );
        }
        Err(e) => return ToolResult::failure(FETCH_URL, ToolError::execution_failed(e.to_string())),
    };

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            return ToolResult::failure(
                FETCH_URL,
                ToolError::execution_failed(format!("Failed to read response body: {}", e)),
            );
        }
    };

    ToolResult::success(FETCH_URL, render(status, &content_type, &body))
}

fn render(status: u16, content_type: &str, body: &str) -> String {
    let body = if content_type.contains("json") {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| body.to_string())
    } else {
        body.to_string()
    };
    format!("Status: {}\nContent-Type: {}\n\n{}", status, content_type, body)
}
