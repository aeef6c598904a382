//! Configuration module for the trendroot CLI.
//!
//! This module contains the configuration structure and environment variable handling
//! for the Twitter/X API integration. The configuration is built once at startup and
//! passed by reference to the API client.

use chrono::{FixedOffset, Local, Offset};
use log::{debug, error, info, warn};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::TrendError;

/// Default root of the Twitter/X API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.x.com";

/// Default pause between two paginated search requests.
pub const DEFAULT_PAGE_PAUSE: Duration = Duration::from_secs(1);

/// Configuration struct for Twitter/X API credentials and CLI settings.
///
/// All five credentials are required. The counts and search endpoints used by the
/// drilldown are app-auth endpoints, so only the bearer token is sent on the wire;
/// the remaining four are validated so a half-configured account fails at startup.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// The Bearer Token for OAuth 2.0 app-only authentication
    pub bearer_token: String,
    /// The API (consumer) key
    pub api_key: String,
    /// The API (consumer) key secret
    pub api_key_secret: String,
    /// The user Access Token
    pub access_token: String,
    /// The user Access Token secret
    pub access_token_secret: String,
    /// Root URL of the API, without a trailing slash
    pub api_base_url: String,
    /// Zone used to render API timestamps as local time
    pub display_offset: FixedOffset,
    /// Directory the export file is written into
    pub output_dir: PathBuf,
    /// Pause between paginated search requests
    pub page_pause: Duration,
}

/// Masks a secret for logging, keeping at most eight characters at each end.
pub(crate) fn mask_secret(secret: &str) -> String {
    let length = secret.chars().count();
    let prefix: String = secret.chars().take(8.min(length)).collect();
    if length > 16 {
        let suffix: String = secret.chars().skip(length - 8).collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

impl TwitterConfig {
    /// Creates a new `TwitterConfig` instance by loading settings from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `TWITTER_BEARER_TOKEN`
    /// - `TWITTER_API_KEY`
    /// - `TWITTER_API_SECRET_KEY`
    /// - `TWITTER_ACCESS_TOKEN`
    /// - `TWITTER_ACCESS_TOKEN_SECRET`
    ///
    /// # Optional Environment Variables
    ///
    /// - `TWITTER_API_BASE_URL`: API root (defaults to `https://api.x.com`)
    /// - `TRENDROOT_UTC_OFFSET_HOURS`: display zone offset (defaults to the local zone)
    /// - `TRENDROOT_OUTPUT_DIR`: export directory (defaults to the working directory)
    /// - `TRENDROOT_PAGE_PAUSE_MS`: pause between search pages (defaults to 1000)
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterConfig)`: If every required variable is present and all optional ones parse
    /// - `Err(TrendError)`: On the first missing credential or malformed setting
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use trendroot::TwitterConfig;
    ///
    /// let config = TwitterConfig::from_env().expect("credentials");
    /// println!("Using API at {}", config.api_base_url);
    /// ```
    pub fn from_env() -> Result<Self, TrendError> {
        info!("Loading Twitter configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TrendError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| -> Result<String, TrendError> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => {
                    info!("Found {} environment variable with length: {}", name, value.len());
                    debug!("{} (masked): {}", name, mask_secret(&value));
                    if value.len() < 10 {
                        warn!("{} seems unusually short ({} characters)", name, value.len());
                    }
                    Ok(value)
                }
                Some(_) => {
                    error!("{} is set but empty", name);
                    Err(TrendError::MissingCredential(name))
                }
                None => {
                    error!("Make sure {} environment variable is set", name);
                    Err(TrendError::MissingCredential(name))
                }
            }
        };

        let bearer_token = require("TWITTER_BEARER_TOKEN")?;
        let api_key = require("TWITTER_API_KEY")?;
        let api_key_secret = require("TWITTER_API_SECRET_KEY")?;
        let access_token = require("TWITTER_ACCESS_TOKEN")?;
        let access_token_secret = require("TWITTER_ACCESS_TOKEN_SECRET")?;

        let api_base_url = lookup("TWITTER_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let display_offset = match lookup("TRENDROOT_UTC_OFFSET_HOURS") {
            Some(raw) => parse_offset_hours(&raw)?,
            None => Local::now().offset().fix(),
        };

        let output_dir = lookup("TRENDROOT_OUTPUT_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let page_pause = match lookup("TRENDROOT_PAGE_PAUSE_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| TrendError::InvalidSetting {
                    name: "TRENDROOT_PAGE_PAUSE_MS",
                    value: raw,
                })?,
            None => DEFAULT_PAGE_PAUSE,
        };

        let config = TwitterConfig {
            bearer_token,
            api_key,
            api_key_secret,
            access_token,
            access_token_secret,
            api_base_url,
            display_offset,
            output_dir,
            page_pause,
        };

        info!(
            "Twitter configuration loaded successfully (api: {}, display offset: {}, output: {})",
            config.api_base_url,
            config.display_offset,
            config.output_dir.display()
        );
        Ok(config)
    }
}

/// Parses a whole-hour UTC offset such as `9`, `+9` or `-5`.
fn parse_offset_hours(raw: &str) -> Result<FixedOffset, TrendError> {
    let invalid = || TrendError::InvalidSetting {
        name: "TRENDROOT_UTC_OFFSET_HOURS",
        value: raw.to_string(),
    };
    let hours: i32 = raw.trim().trim_start_matches('+').parse().map_err(|_| invalid())?;
    FixedOffset::east_opt(hours * 3600).ok_or_else(invalid)
}
