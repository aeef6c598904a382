//! Core Twitter API client.
//!
//! The query stages talk to the API through the [`TwitterApi`] trait so they can
//! run against an in-memory fake. [`HttpTwitterApi`] is the real implementation
//! backed by `reqwest`.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;

use crate::config::TwitterConfig;
use crate::error::TrendError;
use crate::oauth::build_bearer_auth_header;
use crate::window::to_query_param;

use super::models::{CountRequest, CountResponse, SearchPage, SearchRequest};

/// Expansions requested on every search page so authors are embedded.
const SEARCH_EXPANSIONS: &str = "author_id,referenced_tweets.id";
const SEARCH_TWEET_FIELDS: &str = "created_at,referenced_tweets";
const SEARCH_USER_FIELDS: &str = "verified";

/// The two remote endpoints the drilldown depends on.
#[async_trait]
pub trait TwitterApi {
    /// Per-bucket post counts for a query over a time range.
    async fn count_recent(&self, request: &CountRequest) -> Result<CountResponse, TrendError>;

    /// One page of matching posts, newest first.
    async fn search_recent(&self, request: &SearchRequest) -> Result<SearchPage, TrendError>;
}

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let head: String = sanitized.chars().take(max_len).collect();
        format!("{}... [truncated, {} total bytes]", head, text.len())
    } else {
        sanitized
    }
}

/// Appends `key=value` to a query string, percent-encoding the value.
fn push_param(url: &mut String, key: &str, value: &str) {
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(key);
    url.push('=');
    url.push_str(&urlencoding::encode(value));
}

/// Builds the full counts URL for a request.
pub(crate) fn count_url(base_url: &str, request: &CountRequest) -> String {
    let mut url = format!("{}/2/tweets/counts/recent", base_url);
    push_param(&mut url, "query", &request.query);
    push_param(&mut url, "end_time", &to_query_param(request.end_time));
    if let Some(start) = request.start_time {
        push_param(&mut url, "start_time", &to_query_param(start));
    }
    push_param(&mut url, "granularity", request.granularity.as_str());
    url
}

/// Builds the full search URL for one page.
pub(crate) fn search_url(base_url: &str, request: &SearchRequest) -> String {
    let mut url = format!("{}/2/tweets/search/recent", base_url);
    push_param(&mut url, "query", &request.query);
    push_param(&mut url, "end_time", &to_query_param(request.window.end()));
    push_param(&mut url, "start_time", &to_query_param(request.window.start()));
    push_param(&mut url, "expansions", SEARCH_EXPANSIONS);
    push_param(&mut url, "tweet.fields", SEARCH_TWEET_FIELDS);
    push_param(&mut url, "user.fields", SEARCH_USER_FIELDS);
    push_param(&mut url, "max_results", &request.max_results.to_string());
    if let Some(token) = &request.next_token {
        push_param(&mut url, "next_token", token);
    }
    url
}

/// `reqwest`-backed client for the Twitter/X API v2.
pub struct HttpTwitterApi {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl HttpTwitterApi {
    pub fn new(config: &TwitterConfig) -> Self {
        debug!("Building bearer authorization header for {}", config.api_base_url);
        HttpTwitterApi {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            auth_header: build_bearer_auth_header(&config.bearer_token),
        }
    }

    /// Makes an authenticated GET request and returns the body on success.
    ///
    /// # Parameters
    ///
    /// - `url`: Fully built request URL
    /// - `operation_name`: Human-readable name for the operation (for logging)
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The API response body on success
    /// - `Err(TrendError)`: On transport failure or a non-success status
    async fn get_authenticated(&self, url: &str, operation_name: &str) -> Result<String, TrendError> {
        info!("Making authenticated request for operation: {}", operation_name);
        debug!("Request URL: {}", url);
        debug!("Request headers: Authorization: Bearer [REDACTED]");

        let response = self
            .client
            .get(url)
            .header("Authorization", &self.auth_header)
            .send()
            .await?;

        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        let body = response.text().await?;
        if status.is_success() {
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                body.len()
            );
            return Ok(body);
        }

        error!("Operation '{}' failed - Status: {}", operation_name, status);
        let detail = sanitize_for_logging(&body, 200);
        debug!("Error response for '{}': {}", operation_name, detail);
        Err(TrendError::Api {
            operation: operation_name.to_string(),
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl TwitterApi for HttpTwitterApi {
    async fn count_recent(&self, request: &CountRequest) -> Result<CountResponse, TrendError> {
        let url = count_url(&self.base_url, request);
        let body = self.get_authenticated(&url, "count_recent_tweets").await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn search_recent(&self, request: &SearchRequest) -> Result<SearchPage, TrendError> {
        let url = search_url(&self.base_url, request);
        let body = self.get_authenticated(&url, "search_recent_tweets").await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{Granularity, TimeWindow};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_count_url_encodes_query_and_omits_missing_start() {
        let request = CountRequest {
            query: "#広瀬すず".to_string(),
            end_time: Utc.with_ymd_and_hms(2024, 5, 8, 11, 0, 0).unwrap(),
            start_time: None,
            granularity: Granularity::Day,
        };
        let url = count_url("https://api.x.com", &request);
        assert!(url.starts_with("https://api.x.com/2/tweets/counts/recent?query=%23"));
        assert!(url.contains("&end_time=2024-05-08T11%3A00%3A00Z"));
        assert!(!url.contains("start_time"));
        assert!(url.ends_with("&granularity=day"));
    }

    #[test]
    fn test_search_url_carries_pagination_token() {
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let mut request = SearchRequest {
            query: "rust".to_string(),
            window,
            max_results: 100,
            next_token: None,
        };
        let first = search_url("http://localhost", &request);
        assert!(first.contains("start_time=2024-05-01T00%3A00%3A00Z"));
        assert!(first.contains("expansions=author_id%2Creferenced_tweets.id"));
        assert!(first.contains("max_results=100"));
        assert!(!first.contains("next_token"));

        request.next_token = Some("abc123".to_string());
        assert!(search_url("http://localhost", &request).ends_with("&next_token=abc123"));
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(sanitize_for_logging("a\nb\tc", 50), "a b c");
        let long = "x".repeat(30);
        assert!(sanitize_for_logging(&long, 10).starts_with("xxxxxxxxxx... [truncated, 30 total bytes]"));
    }
}
