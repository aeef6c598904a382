//! Error types for the trend-root pipeline.
//!
//! Every query stage returns [`TrendError`]. The drilldown controller is the
//! boundary that reports these errors and ends the run without exporting.

use thiserror::Error;

/// Errors raised while loading configuration, talking to the Twitter/X API,
/// or writing the export file.
#[derive(Debug, Error)]
pub enum TrendError {
    /// A required credential environment variable is unset or empty.
    #[error("missing {0} environment variable")]
    MissingCredential(&'static str),

    /// An optional setting was present but could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Twitter API error for operation '{operation}' ({status}): {detail}")]
    Api {
        operation: String,
        status: u16,
        detail: String,
    },

    #[error("failed to decode API response: {0}")]
    Json(#[from] serde_json::Error),

    /// The search endpoint reported results but sent no `data` array.
    #[error("search response for '{query}' carried no tweet data")]
    MissingPayload { query: String },

    /// A tweet referenced an author that was not embedded in the page's
    /// `includes.users` list.
    #[error("author {author_id} of tweet {tweet_id} not found in response includes")]
    AuthorNotFound { tweet_id: String, author_id: String },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("time window starts after it ends ({start} > {end})")]
    InvalidWindow { start: String, end: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrendError {
    /// True when the API broke its own response contract. These end the run
    /// as an error instead of a plain abort.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, TrendError::AuthorNotFound { .. })
    }
}

/// Errors raised by the headline digest.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid selector '{0}'")]
    Selector(String),

    /// The page no longer has the structure the parser expects.
    #[error("{0} is None.")]
    MissingElement(&'static str),

    #[error("unknown category '{0}'")]
    UnknownCategory(char),

    /// robots.txt forbids at least one of the listed URLs.
    #[error("Web scraping is not permitted: {}", .0.join(", "))]
    Disallowed(Vec<String>),
}
