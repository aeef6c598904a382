//! # Trendroot
//!
//! Interactive command line tool that shows how a hashtag or phrase spread over
//! the last week and exports the tweets of a chosen day, hour or minute.
//!
//! ## Environment Variables
//!
//! - `TWITTER_BEARER_TOKEN`, `TWITTER_API_KEY`, `TWITTER_API_SECRET_KEY`,
//!   `TWITTER_ACCESS_TOKEN`, `TWITTER_ACCESS_TOKEN_SECRET`: required credentials
//! - `RUST_LOG`: log level for diagnostics written to stderr

use log::{error, info};

use trendroot::{Console, Drilldown, HttpTwitterApi, RunReport, StdConsole, TwitterConfig};

/// Main entry point for the trend root drilldown.
///
/// Loads the configuration, asks for the search phrase, and runs one drilldown
/// session. Aborted sessions return normally; configuration, I/O and data
/// integrity failures exit with status 1.
///
/// # Example Usage
///
/// ```bash
/// # Run with debug logging
/// RUST_LOG=debug cargo run --bin trendroot
/// ```
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = match TwitterConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let api = HttpTwitterApi::new(&config);
    let mut console = StdConsole;

    let query = match console.prompt("\nInput target text for searching trend root: ") {
        Ok(query) => query.trim().to_string(),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    if query.is_empty() {
        console.say("Empty search text. Abort process.");
        return;
    }

    let drilldown = Drilldown::new(&api, &config);
    match drilldown.run(&mut console, &query, chrono::Utc::now()).await {
        Ok(RunReport::Exported { path, records }) => {
            info!("Exported {} tweets to {}", records, path.display());
        }
        Ok(RunReport::Aborted(reason)) => {
            info!("Run aborted: {:?}", reason);
        }
        Err(e) => {
            error!("Drilldown failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
