//! **Web Tools** — `fetch_url` and `web_search`
//!
//! | Tool | Description | Risk | Key Dependency |
//! |------|-------------|------|----------------|
//! | `fetch_url` | HTTP GET, returns status, content type and body | Safe | `reqwest` |
//! | `web_search` | DuckDuckGo HTML results page, parsed | Safe | `reqwest` + `scraper` |
//!
//! Both share the executor's [`reqwest::Client`]; each request carries its
//! own timeout.

pub mod fetch;
pub mod search;

pub use fetch::{FETCH_URL, execute_fetch_url, fetch_url_definition};
pub use search::{WEB_SEARCH, execute_web_search, parse_results, web_search_definition};
