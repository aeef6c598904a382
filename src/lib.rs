//! # Trendroot Library
//!
//! Interactive tools for exploring where a topic came from on Twitter/X, and for
//! reading a news portal's headlines from the terminal.
//!
//! ## Features
//!
//! - Volume tables of recent tweet counts at day, hour and minute granularity
//! - Drilldown from a day to an hour to a minute, as an explicit state machine
//! - Paginated tweet retrieval with retweet collapsing and author resolution
//! - JSON export of the collected tweets, oldest first
//! - Headline digest with a robots.txt check and East Asian width alignment
//!
//! ## Configuration
//!
//! The following environment variables are required:
//! - `TWITTER_BEARER_TOKEN`
//! - `TWITTER_API_KEY`
//! - `TWITTER_API_SECRET_KEY`
//! - `TWITTER_ACCESS_TOKEN`
//! - `TWITTER_ACCESS_TOKEN_SECRET`
//!
//! See [`TwitterConfig::from_env`] for the optional settings.

pub mod config;
pub mod console;
pub mod content;
pub mod drilldown;
pub mod error;
pub mod export;
pub mod news;
pub mod oauth;
pub mod twitter;
pub mod volume;
pub mod window;

// Re-export commonly used types and functions
pub use config::TwitterConfig;
pub use console::{Console, StdConsole};
pub use content::{ContentQuery, PostRecord, DEFAULT_MAX_RECORDS, EXPORT_MAX_RECORDS};
pub use drilldown::{parse_index_range, DrillState, Drilldown, RunReport};
pub use error::TrendError;
pub use export::{export_filename, read_export, write_export};
pub use oauth::build_bearer_auth_header;
pub use twitter::{HttpTwitterApi, TwitterApi};
pub use volume::{query_volume, render_volume_table, CountBucket};
pub use window::{Granularity, TimeWindow};
