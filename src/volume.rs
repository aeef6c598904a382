//! Volume query: per-bucket post counts for a search phrase.
//!
//! The counts endpoint returns every bucket of the requested range in a single
//! response, so there is no pagination here.

use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, info, warn};

use crate::error::TrendError;
use crate::twitter::{CountRequest, TwitterApi};
use crate::window::{format_minutes, Granularity, TimeWindow};

/// One time slice returned by the volume query. Its position in the returned
/// list is the index the user types to select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBucket {
    pub window: TimeWindow,
    pub count: u64,
}

impl CountBucket {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Asks the counts endpoint for post volume over `[start, end]` at the given
/// granularity and returns the buckets ordered by start time.
///
/// # Errors
///
/// Transport and API failures, and bucket boundaries that cannot be parsed.
pub async fn query_volume<A>(
    api: &A,
    query: &str,
    end_time: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    granularity: Granularity,
) -> Result<Vec<CountBucket>, TrendError>
where
    A: TwitterApi + ?Sized,
{
    info!(
        "Counting tweets for '{}' by {} up to {}",
        query, granularity, end_time
    );

    let request = CountRequest {
        query: query.to_string(),
        end_time,
        start_time,
        granularity,
    };
    let response = api.count_recent(&request).await?;

    let mut buckets = response
        .data
        .iter()
        .map(|item| {
            Ok(CountBucket {
                window: TimeWindow::from_api(&item.start, &item.end)?,
                count: item.tweet_count,
            })
        })
        .collect::<Result<Vec<_>, TrendError>>()?;

    if buckets.windows(2).any(|pair| pair[0].window.start() >= pair[1].window.start()) {
        warn!("Count buckets for '{}' arrived out of order, sorting", query);
        buckets.sort_by_key(|bucket| bucket.window.start());
        buckets.dedup_by_key(|bucket| bucket.window.start());
    }

    let total: u64 = buckets.iter().map(|b| b.count).sum();
    debug!("Received {} {} buckets, {} tweets in total", buckets.len(), granularity, total);
    Ok(buckets)
}

/// Renders the numbered volume table shown to the user.
///
/// Non-empty buckets are marked with `*`. At minute granularity a blank line
/// precedes every tenth row.
pub fn render_volume_table(
    buckets: &[CountBucket],
    granularity: Granularity,
    zone: FixedOffset,
) -> String {
    let mut lines = Vec::with_capacity(buckets.len());
    for (i, bucket) in buckets.iter().enumerate() {
        if granularity == Granularity::Minute && i % 10 == 0 {
            lines.push(String::new());
        }
        let mark = if bucket.is_empty() { ' ' } else { '*' };
        lines.push(format!(
            "[{:02} {}] {} -> {} : [Tweet Counts: {}]",
            i,
            mark,
            format_minutes(bucket.window.start(), zone),
            format_minutes(bucket.window.end(), zone),
            bucket.count
        ));
    }
    lines.join("\n")
}
