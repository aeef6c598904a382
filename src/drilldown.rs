//! Interactive drilldown from day to hour to minute buckets.
//!
//! The flow is an explicit state machine. [`DrillState`] transitions are pure
//! functions of the user's input, and [`Drilldown::run`] drives them against a
//! [`Console`] and a [`TwitterApi`].

use chrono::{DateTime, FixedOffset, Utc};
use log::{error, info, warn};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::TwitterConfig;
use crate::console::Console;
use crate::content::{ContentQuery, EXPORT_MAX_RECORDS};
use crate::error::TrendError;
use crate::export::{export_filename, write_export};
use crate::twitter::TwitterApi;
use crate::volume::{query_volume, render_volume_table, CountBucket};
use crate::window::{Granularity, TimeWindow};

/// Parses an inclusive index range typed as `a..b`. The bounds may be given in
/// either order. Input without `..` is not a range.
pub fn parse_index_range(input: &str) -> Option<RangeInclusive<usize>> {
    if !input.contains("..") {
        return None;
    }
    let parts: Vec<&str> = input.split("..").collect();
    if parts.len() != 2 {
        return None;
    }
    let a: usize = parts[0].trim().parse().ok()?;
    let b: usize = parts[1].trim().parse().ok()?;
    Some(a.min(b)..=a.max(b))
}

/// What the user picked from a volume table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(usize),
    Range(RangeInclusive<usize>),
}

impl Selection {
    /// A run of ASCII digits is a single index; otherwise the input must be a range.
    pub fn parse(input: &str) -> Option<Selection> {
        let input = input.trim();
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            return input.parse().ok().map(Selection::Single);
        }
        parse_index_range(input).map(Selection::Range)
    }
}

/// Choice offered after a single bucket is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    DrillDown,
    Save,
    Abort,
}

impl NextAction {
    pub fn parse(input: &str) -> Option<NextAction> {
        match input.trim().to_uppercase().as_str() {
            "D" => Some(NextAction::DrillDown),
            "S" => Some(NextAction::Save),
            "A" => Some(NextAction::Abort),
            _ => None,
        }
    }
}

/// Why a run ended without exporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    UserAbort,
    UnknownCommand(String),
    InvalidIndex(String),
    IndexOutOfRange { index: usize, len: usize },
    VolumeUnavailable,
    ContentUnavailable,
}

impl AbortReason {
    pub fn message(&self) -> &'static str {
        match self {
            AbortReason::UserAbort => "Abort process.",
            AbortReason::UnknownCommand(_) => "Unknown command. Abort process.",
            AbortReason::InvalidIndex(_) => "Invalid index. Abort process.",
            AbortReason::IndexOutOfRange { .. } => "Index out of range. Abort process.",
            AbortReason::VolumeUnavailable => "Failed to get tweet counts. Abort process.",
            AbortReason::ContentUnavailable => "Failed to get tweet data. Abort process.",
        }
    }
}

/// How the terminal state resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Fetch these windows, in order, and write one export file.
    Export(Vec<TimeWindow>),
    Abort(AbortReason),
}

/// Drilldown states.
///
/// `AwaitIndex` at day, hour and minute granularity covers the three index
/// prompts; `AwaitNextAction` is the D/S/A prompt after a single day or hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillState {
    /// Show the volume table of `window` at `granularity` and wait for an index.
    AwaitIndex {
        granularity: Granularity,
        window: TimeWindow,
    },
    /// A single bucket was picked; wait for drill/save/abort.
    AwaitNextAction {
        granularity: Granularity,
        selected: TimeWindow,
    },
    Terminal(Outcome),
}

impl DrillState {
    /// Entry state: day buckets over `window`.
    pub fn start(window: TimeWindow) -> Self {
        DrillState::AwaitIndex {
            granularity: Granularity::Day,
            window,
        }
    }

    /// Transition for an index answer given the buckets on screen.
    ///
    /// A single index at minute granularity saves immediately since nothing
    /// finer exists. A range always exports every bucket in it.
    pub fn on_index(granularity: Granularity, buckets: &[CountBucket], input: &str) -> Self {
        let len = buckets.len();
        match Selection::parse(input) {
            Some(Selection::Single(index)) => match buckets.get(index) {
                Some(bucket) if granularity.finer().is_some() => DrillState::AwaitNextAction {
                    granularity,
                    selected: bucket.window,
                },
                Some(bucket) => DrillState::Terminal(Outcome::Export(vec![bucket.window])),
                None => DrillState::Terminal(Outcome::Abort(AbortReason::IndexOutOfRange {
                    index,
                    len,
                })),
            },
            Some(Selection::Range(range)) => {
                let high = *range.end();
                if high >= len {
                    return DrillState::Terminal(Outcome::Abort(AbortReason::IndexOutOfRange {
                        index: high,
                        len,
                    }));
                }
                let windows = buckets[range].iter().map(|bucket| bucket.window).collect();
                DrillState::Terminal(Outcome::Export(windows))
            }
            None => DrillState::Terminal(Outcome::Abort(AbortReason::InvalidIndex(
                input.to_string(),
            ))),
        }
    }

    /// Transition for a D/S/A answer about the `selected` bucket.
    pub fn on_command(granularity: Granularity, selected: TimeWindow, input: &str) -> Self {
        match NextAction::parse(input) {
            Some(NextAction::Save) => DrillState::Terminal(Outcome::Export(vec![selected])),
            Some(NextAction::Abort) => DrillState::Terminal(Outcome::Abort(AbortReason::UserAbort)),
            Some(NextAction::DrillDown) => match granularity.finer() {
                Some(finer) => DrillState::AwaitIndex {
                    granularity: finer,
                    window: selected,
                },
                None => DrillState::Terminal(Outcome::Export(vec![selected])),
            },
            None => DrillState::Terminal(Outcome::Abort(AbortReason::UnknownCommand(
                input.to_string(),
            ))),
        }
    }
}

/// How a completed run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Exported { path: PathBuf, records: usize },
    Aborted(AbortReason),
}

/// Drives one interactive drilldown session.
pub struct Drilldown<'a, A: ?Sized> {
    api: &'a A,
    zone: FixedOffset,
    page_pause: Duration,
    output_dir: PathBuf,
}

impl<'a, A> Drilldown<'a, A>
where
    A: TwitterApi + ?Sized,
{
    pub fn new(api: &'a A, config: &TwitterConfig) -> Self {
        Drilldown {
            api,
            zone: config.display_offset,
            page_pause: config.page_pause,
            output_dir: config.output_dir.clone(),
        }
    }

    /// Runs the session for `query`, starting from the seven days before `now`.
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: The run exported a file or aborted cleanly
    /// - `Err(TrendError)`: Console I/O failed, the export file could not be
    ///   written, or the API returned a post whose author was not embedded
    pub async fn run<C>(
        &self,
        console: &mut C,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<RunReport, TrendError>
    where
        C: Console + ?Sized,
    {
        info!("Starting trend root drilldown for '{}'", query);
        let mut state = DrillState::start(TimeWindow::lookback(now));

        loop {
            state = match state {
                DrillState::AwaitIndex {
                    granularity,
                    window,
                } => {
                    match query_volume(
                        self.api,
                        query,
                        window.end(),
                        Some(window.start()),
                        granularity,
                    )
                    .await
                    {
                        Ok(buckets) => {
                            console.say(&render_volume_table(&buckets, granularity, self.zone));
                            let answer =
                                console.prompt(&format!("\nInput target {} index: ", granularity))?;
                            DrillState::on_index(granularity, &buckets, &answer)
                        }
                        Err(e) => {
                            error!("Failed to count tweets for '{}': {}", query, e);
                            console.say(&e.to_string());
                            DrillState::Terminal(Outcome::Abort(AbortReason::VolumeUnavailable))
                        }
                    }
                }
                DrillState::AwaitNextAction {
                    granularity,
                    selected,
                } => {
                    console.say("\nDrill down more [D] or Save tweet data [S] or Abort [A]");
                    let answer = console.prompt("Input command: ")?;
                    DrillState::on_command(granularity, selected, &answer)
                }
                DrillState::Terminal(outcome) => return self.finish(console, query, outcome).await,
            };
        }
    }

    async fn finish<C>(
        &self,
        console: &mut C,
        query: &str,
        outcome: Outcome,
    ) -> Result<RunReport, TrendError>
    where
        C: Console + ?Sized,
    {
        let windows = match outcome {
            Outcome::Export(windows) => windows,
            Outcome::Abort(reason) => {
                info!("Drilldown for '{}' aborted: {:?}", query, reason);
                console.say(reason.message());
                return Ok(RunReport::Aborted(reason));
            }
        };

        let fetcher = ContentQuery::new(self.api, self.zone, self.page_pause);
        let records = match fetcher
            .fetch_windows(query, &windows, EXPORT_MAX_RECORDS)
            .await
        {
            Ok(records) => records,
            Err(e) if e.is_data_integrity() => {
                error!("Inconsistent search response for '{}': {}", query, e);
                return Err(e);
            }
            Err(e) => {
                warn!("Failed to fetch tweets for '{}': {}", query, e);
                console.say(&e.to_string());
                let reason = AbortReason::ContentUnavailable;
                console.say(reason.message());
                return Ok(RunReport::Aborted(reason));
            }
        };

        console.say(&format!("Got {} tweet data.", records.len()));
        let path = write_export(&self.output_dir, query, &records)?;
        console.say(&format!("Saved as \"{}\".", export_filename(query)));

        Ok(RunReport::Exported {
            path,
            records: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day_buckets(n: usize) -> Vec<CountBucket> {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| CountBucket {
                window: TimeWindow::new(
                    base + chrono::Duration::days(i as i64),
                    base + chrono::Duration::days(i as i64 + 1),
                )
                .unwrap(),
                count: i as u64,
            })
            .collect()
    }

    #[test]
    fn test_parse_index_range_is_order_independent() {
        assert_eq!(parse_index_range("5..2"), Some(2..=5));
        assert_eq!(parse_index_range("2..5"), Some(2..=5));
        assert_eq!(parse_index_range(" 3 .. 7 "), Some(3..=7));
        assert_eq!(parse_index_range("4..4"), Some(4..=4));
    }

    #[test]
    fn test_parse_index_range_rejects_non_ranges() {
        assert_eq!(parse_index_range("5"), None);
        assert_eq!(parse_index_range("1..2..3"), None);
        assert_eq!(parse_index_range("a..3"), None);
        assert_eq!(parse_index_range(".."), None);
        assert_eq!(parse_index_range("-1..3"), None);
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::parse("07"), Some(Selection::Single(7)));
        assert_eq!(Selection::parse("2..5"), Some(Selection::Range(2..=5)));
        assert_eq!(Selection::parse("x"), None);
        assert_eq!(Selection::parse(""), None);
        assert_eq!(Selection::parse("+3"), None);
    }

    #[test]
    fn test_next_action_is_case_insensitive() {
        assert_eq!(NextAction::parse("d"), Some(NextAction::DrillDown));
        assert_eq!(NextAction::parse("S"), Some(NextAction::Save));
        assert_eq!(NextAction::parse(" a "), Some(NextAction::Abort));
        assert_eq!(NextAction::parse("q"), None);
    }

    #[test]
    fn test_single_day_index_asks_for_next_action() {
        let buckets = day_buckets(7);
        let state = DrillState::on_index(Granularity::Day, &buckets, "3");
        assert_eq!(
            state,
            DrillState::AwaitNextAction {
                granularity: Granularity::Day,
                selected: buckets[3].window,
            }
        );
    }

    #[test]
    fn test_single_minute_index_saves_immediately() {
        let buckets = day_buckets(60);
        let state = DrillState::on_index(Granularity::Minute, &buckets, "42");
        assert_eq!(
            state,
            DrillState::Terminal(Outcome::Export(vec![buckets[42].window]))
        );
    }

    #[test]
    fn test_range_exports_each_bucket_in_order() {
        let buckets = day_buckets(7);
        let state = DrillState::on_index(Granularity::Hour, &buckets, "4..2");
        let expected = vec![buckets[2].window, buckets[3].window, buckets[4].window];
        assert_eq!(state, DrillState::Terminal(Outcome::Export(expected)));
    }

    #[test]
    fn test_invalid_and_out_of_range_indices_abort() {
        let buckets = day_buckets(7);
        assert_eq!(
            DrillState::on_index(Granularity::Day, &buckets, "two"),
            DrillState::Terminal(Outcome::Abort(AbortReason::InvalidIndex("two".to_string())))
        );
        assert_eq!(
            DrillState::on_index(Granularity::Day, &buckets, "7"),
            DrillState::Terminal(Outcome::Abort(AbortReason::IndexOutOfRange { index: 7, len: 7 }))
        );
        assert_eq!(
            DrillState::on_index(Granularity::Day, &buckets, "5..9"),
            DrillState::Terminal(Outcome::Abort(AbortReason::IndexOutOfRange { index: 9, len: 7 }))
        );
    }

    #[test]
    fn test_next_action_transitions() {
        let selected = day_buckets(1)[0].window;
        assert_eq!(
            DrillState::on_command(Granularity::Day, selected, "D"),
            DrillState::AwaitIndex {
                granularity: Granularity::Hour,
                window: selected,
            }
        );
        assert_eq!(
            DrillState::on_command(Granularity::Hour, selected, "d"),
            DrillState::AwaitIndex {
                granularity: Granularity::Minute,
                window: selected,
            }
        );
        assert_eq!(
            DrillState::on_command(Granularity::Day, selected, "s"),
            DrillState::Terminal(Outcome::Export(vec![selected]))
        );
        assert_eq!(
            DrillState::on_command(Granularity::Day, selected, "A"),
            DrillState::Terminal(Outcome::Abort(AbortReason::UserAbort))
        );
        assert_eq!(
            DrillState::on_command(Granularity::Day, selected, "x"),
            DrillState::Terminal(Outcome::Abort(AbortReason::UnknownCommand("x".to_string())))
        );
    }
}
