//! Time windows and timestamp formatting.
//!
//! The API reports bucket boundaries as UTC ISO-8601 strings with millisecond
//! precision. Windows are kept in UTC with sub-second precision stripped so they
//! can be sent straight back as `start_time`/`end_time` parameters, and are
//! shifted into the configured display zone only for printing.

use chrono::{DateTime, Duration, FixedOffset, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TrendError;

/// Bucket width for the volume query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Hour,
    Minute,
}

impl Granularity {
    /// The value sent as the `granularity` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Hour => "hour",
            Granularity::Minute => "minute",
        }
    }

    /// The next finer granularity, or `None` at minute level.
    pub fn finer(&self) -> Option<Granularity> {
        match self {
            Granularity::Day => Some(Granularity::Hour),
            Granularity::Hour => Some(Granularity::Minute),
            Granularity::Minute => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed UTC time range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TrendError> {
        if start > end {
            return Err(TrendError::InvalidWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(TimeWindow { start, end })
    }

    /// Builds a window from the raw `start`/`end` strings of a count bucket.
    pub fn from_api(start: &str, end: &str) -> Result<Self, TrendError> {
        TimeWindow::new(parse_api_timestamp(start)?, parse_api_timestamp(end)?)
    }

    /// The initial drilldown range: the last seven days, ending one hour ago.
    ///
    /// Recent search only retains seven days, so the start sits one minute
    /// inside that limit.
    pub fn lookback(now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(0);
        TimeWindow {
            start: now - Duration::days(7) + Duration::minutes(1),
            end: now - Duration::hours(1),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Parses an API timestamp such as `2024-05-01T00:00:00.000Z`, dropping the
/// sub-second part.
pub fn parse_api_timestamp(raw: &str) -> Result<DateTime<Utc>, TrendError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(0))
        .map_err(|_| TrendError::InvalidTimestamp(raw.to_string()))
}

/// Formats a timestamp for a `start_time`/`end_time` query parameter.
pub fn to_query_param(ts: DateTime<Utc>) -> String {
    ts.trunc_subsecs(0).format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Bucket boundary format used in the volume table.
pub fn format_minutes(ts: DateTime<Utc>, zone: FixedOffset) -> String {
    ts.with_timezone(&zone).format("%Y-%m-%d %H:%M").to_string()
}

/// Post timestamp format used in exported records.
pub fn format_seconds(ts: DateTime<Utc>, zone: FixedOffset) -> String {
    ts.with_timezone(&zone).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_api_timestamp_strips_millis() {
        let ts = parse_api_timestamp("2024-05-01T12:34:56.789Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap());
        assert_eq!(to_query_param(ts), "2024-05-01T12:34:56Z");
    }

    #[test]
    fn test_parse_api_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_api_timestamp("yesterday"),
            Err(TrendError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_window_rejects_reversed_bounds() {
        let a = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert!(TimeWindow::new(a, b).is_err());
        assert!(TimeWindow::new(b, a).is_ok());
        assert!(TimeWindow::new(a, a).is_ok());
    }

    #[test]
    fn test_display_formats_shift_into_zone() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 15).unwrap();
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_minutes(ts, jst), "2024-05-02 05:30");
        assert_eq!(format_seconds(ts, jst), "2024-05-02 05:30:15");
    }

    #[test]
    fn test_lookback_window() {
        let now = Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).unwrap();
        let window = TimeWindow::lookback(now);
        assert_eq!(window.end(), Utc.with_ymd_and_hms(2024, 5, 8, 11, 0, 0).unwrap());
        assert_eq!(window.start(), Utc.with_ymd_and_hms(2024, 5, 1, 12, 1, 0).unwrap());
    }

    #[test]
    fn test_granularity_order() {
        assert_eq!(Granularity::Day.finer(), Some(Granularity::Hour));
        assert_eq!(Granularity::Hour.finer(), Some(Granularity::Minute));
        assert_eq!(Granularity::Minute.finer(), None);
        assert_eq!(Granularity::Minute.to_string(), "minute");
    }
}
