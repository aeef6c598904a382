//! Wire types for the Twitter/X API v2 recent counts and recent search endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::{Granularity, TimeWindow};

/// Parameters for `GET /2/tweets/counts/recent`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountRequest {
    pub query: String,
    pub end_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub granularity: Granularity,
}

/// Parameters for one page of `GET /2/tweets/search/recent`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub window: TimeWindow,
    pub max_results: u32,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    #[serde(default)]
    pub data: Vec<CountItem>,
    pub meta: Option<CountMeta>,
}

/// One bucket as returned by the counts endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountItem {
    pub start: String,
    pub end: String,
    pub tweet_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountMeta {
    #[serde(default)]
    pub total_tweet_count: u64,
}

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub data: Option<Vec<Tweet>>,
    pub includes: Option<Includes>,
    #[serde(default)]
    pub meta: SearchMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMeta {
    #[serde(default)]
    pub result_count: u64,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search_page() {
        let body = r#"{
            "data": [
                {"id": "1790000000000000001", "text": "hello", "author_id": "42",
                 "created_at": "2024-05-01T03:04:05.000Z", "edit_history_tweet_ids": ["1"]}
            ],
            "includes": {"users": [{"id": "42", "name": "Alice", "username": "alice"}]},
            "meta": {"result_count": 1, "next_token": "b26v89c19zqg8o3f"}
        }"#;
        let page: SearchPage = serde_json::from_str(body).unwrap();

        let tweets = page.data.unwrap();
        assert_eq!(tweets[0].author_id, "42");
        assert_eq!(tweets[0].created_at.to_rfc3339(), "2024-05-01T03:04:05+00:00");
        let users = page.includes.unwrap().users;
        assert!(!users[0].verified);
        assert_eq!(page.meta.next_token.as_deref(), Some("b26v89c19zqg8o3f"));
    }

    #[test]
    fn test_decode_empty_search_page() {
        let page: SearchPage = serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(page.data.is_none());
        assert_eq!(page.meta.result_count, 0);
    }

    #[test]
    fn test_decode_counts() {
        let body = r#"{
            "data": [
                {"end": "2024-05-02T00:00:00.000Z", "start": "2024-05-01T00:00:00.000Z", "tweet_count": 7}
            ],
            "meta": {"total_tweet_count": 7}
        }"#;
        let counts: CountResponse = serde_json::from_str(body).unwrap();
        assert_eq!(counts.data.len(), 1);
        assert_eq!(counts.data[0].tweet_count, 7);
    }
}
