//! News Headline Digest
//!
//! Prints Yahoo! News Japan headlines for the categories you pick, either as
//! the condensed front-page digest or, with `--full`, the complete topics list.

use clap::Parser;
use log::error;

use trendroot::console::{Console, StdConsole};
use trendroot::news::{parse_categories, render_category, NewsClient, DEFAULT_BASE_URL, FETCH_PAUSE};

#[derive(Debug, Parser)]
#[command(name = "headlines", about = "Print news headlines by category")]
struct Args {
    /// Print the full topics listing instead of the front-page digest
    #[arg(short, long)]
    full: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut console = StdConsole;

    let client = match NewsClient::new(DEFAULT_BASE_URL, FETCH_PAUSE) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.check_robots().await {
        error!("robots.txt check failed: {}", e);
        if let trendroot::error::NewsError::Disallowed(urls) = &e {
            for url in urls {
                console.say(&format!("can not scrape: {}", url));
            }
        }
        console.say("Webスクレイピングが禁止されています。");
        return;
    }

    console.say("取得するニュースのジャンルを指定してください。（例：me, b, ...）");
    let answer = match console.prompt("主要[m], 国内[d], 経済[b], エンタメ[e], 国際[w]: ") {
        Ok(answer) => answer,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    console.say("");

    let categories = match parse_categories(&answer) {
        Ok(categories) => categories,
        Err(e) => {
            console.say(&e.to_string());
            return;
        }
    };

    for category in categories {
        let result = if args.full {
            client.topics(category).await
        } else {
            client.digest(category).await
        };
        match result {
            Ok(headlines) => console.say(&render_category(category, &headlines)),
            Err(e) => {
                error!("Failed to read {} headlines: {}", category.label(), e);
                console.say(&e.to_string());
                break;
            }
        }
    }
}
