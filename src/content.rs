//! Content query: paginated retrieval of the posts inside a time window.
//!
//! The search endpoint pages newest-first. Pages are accumulated until the
//! window is exhausted, the record cap is reached, or no continuation token is
//! returned; the collected list is then reversed so callers get oldest-first.

use chrono::FixedOffset;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TrendError;
use crate::twitter::{
    collapse_retweet, sanitize_for_logging, tweet_url, SearchRequest, Tweet, TwitterApi, User,
};
use crate::window::{format_seconds, TimeWindow};

/// Posts requested per search page.
pub const PAGE_SIZE: u32 = 100;

/// Record cap when the caller does not pass one.
pub const DEFAULT_MAX_RECORDS: usize = 3000;

/// Record cap used by the export paths of the drilldown.
pub const EXPORT_MAX_RECORDS: usize = 1000;

/// A normalized post, as written to the export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Creation time in the display zone, `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
    #[serde(rename = "user_id")]
    pub author_id: String,
    #[serde(rename = "name")]
    pub author_name: String,
    /// `@`-prefixed handle
    #[serde(rename = "username")]
    pub author_handle: String,
    #[serde(rename = "verified")]
    pub author_verified: bool,
    #[serde(rename = "tweet_id")]
    pub post_id: String,
    /// Full text, or a short placeholder for retweets
    pub text: String,
    #[serde(rename = "tweet_url")]
    pub url: String,
}

impl PostRecord {
    fn from_tweet(tweet: &Tweet, author: &User, zone: FixedOffset) -> Self {
        PostRecord {
            created_at: format_seconds(tweet.created_at, zone),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            author_handle: format!("@{}", author.username),
            author_verified: author.verified,
            post_id: tweet.id.clone(),
            text: collapse_retweet(&tweet.text),
            url: tweet_url(&author.username, &tweet.id),
        }
    }
}

/// Resolves a tweet's author against the users embedded in the same page.
fn find_author<'a>(users: &'a [User], tweet: &Tweet) -> Result<&'a User, TrendError> {
    users
        .iter()
        .find(|user| user.id == tweet.author_id)
        .ok_or_else(|| TrendError::AuthorNotFound {
            tweet_id: tweet.id.clone(),
            author_id: tweet.author_id.clone(),
        })
}

/// Runs content queries against a [`TwitterApi`].
pub struct ContentQuery<'a, A: ?Sized> {
    api: &'a A,
    zone: FixedOffset,
    page_pause: Duration,
}

impl<'a, A> ContentQuery<'a, A>
where
    A: TwitterApi + ?Sized,
{
    /// `zone` is used for `created_at`; `page_pause` is slept between pages.
    pub fn new(api: &'a A, zone: FixedOffset, page_pause: Duration) -> Self {
        ContentQuery {
            api,
            zone,
            page_pause,
        }
    }

    /// Fetches up to `max_records` posts matching `query` inside `window`,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// - Transport/API failures from any page
    /// - [`TrendError::MissingPayload`] when a page reports results but carries no data
    /// - [`TrendError::AuthorNotFound`] when a post's author is absent from the page includes
    pub async fn fetch(
        &self,
        query: &str,
        window: TimeWindow,
        max_records: usize,
    ) -> Result<Vec<PostRecord>, TrendError> {
        info!(
            "Fetching up to {} tweets for '{}' between {} and {}",
            max_records,
            query,
            window.start(),
            window.end()
        );

        let mut records: Vec<PostRecord> = Vec::new();
        if max_records == 0 {
            return Ok(records);
        }

        let mut next_token: Option<String> = None;
        let mut page_count = 0;

        loop {
            page_count += 1;
            info!("Fetching page {} of search results", page_count);

            let request = SearchRequest {
                query: query.to_string(),
                window,
                max_results: PAGE_SIZE,
                next_token: next_token.take(),
            };
            let page = self.api.search_recent(&request).await?;

            if page.meta.result_count == 0 {
                info!("No tweets found in page {}, window exhausted", page_count);
                break;
            }
            let tweets = page.data.ok_or_else(|| TrendError::MissingPayload {
                query: query.to_string(),
            })?;
            let users = page.includes.map(|includes| includes.users).unwrap_or_default();
            debug!(
                "Page {}: {} tweets, {} embedded users",
                page_count,
                tweets.len(),
                users.len()
            );

            for tweet in &tweets {
                let author = find_author(&users, tweet)?;
                debug!(
                    "Tweet {} by @{}: {}",
                    tweet.id,
                    author.username,
                    sanitize_for_logging(&tweet.text, 80)
                );
                records.push(PostRecord::from_tweet(tweet, author, self.zone));
                if records.len() >= max_records {
                    break;
                }
            }

            match page.meta.next_token {
                Some(token) if records.len() < max_records => {
                    next_token = Some(token);
                    tokio::time::sleep(self.page_pause).await;
                }
                Some(_) => {
                    warn!("Reached record cap ({}), stopping pagination", max_records);
                    break;
                }
                None => {
                    info!("No more pages to fetch");
                    break;
                }
            }
        }

        records.reverse();
        info!(
            "Collected {} tweets for '{}' over {} pages",
            records.len(),
            query,
            page_count
        );
        Ok(records)
    }

    /// Fetches several windows in order, sharing one record cap across all of
    /// them. Each window's records are oldest-first; windows are concatenated
    /// in the order given.
    pub async fn fetch_windows(
        &self,
        query: &str,
        windows: &[TimeWindow],
        max_records: usize,
    ) -> Result<Vec<PostRecord>, TrendError> {
        let mut records = Vec::new();
        for window in windows {
            let remaining = max_records.saturating_sub(records.len());
            if remaining == 0 {
                info!("Record cap ({}) reached before all windows were fetched", max_records);
                break;
            }
            records.extend(self.fetch(query, *window, remaining).await?);
        }
        Ok(records)
    }
}
