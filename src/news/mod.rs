//! News portal headline digest.
//!
//! Fetches headline lists per category from Yahoo! News Japan, either the full
//! per-category topics listing or the condensed digest on each front page, after
//! checking the site's robots.txt.

mod robots;
mod scrape;
mod width;

pub use robots::RobotsPolicy;
pub use scrape::{parse_digest_page, parse_topics_page};
pub use width::{display_width, text_align, Align};

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::error::NewsError;

/// Portal root.
pub const DEFAULT_BASE_URL: &str = "https://news.yahoo.co.jp";

/// Display width headlines are padded to before the link.
pub const HEADLINE_WIDTH: usize = 34;

/// Pause after every page fetch.
pub const FETCH_PAUSE: Duration = Duration::from_secs(1);

/// Paths robots.txt must allow before anything is scraped.
const CHECKED_PATHS: [&str; 3] = ["/", "/categories/", "/topics/"];

/// A headline category, selected by a single letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Top,
    Domestic,
    Business,
    Entertainment,
    World,
}

impl Category {
    pub fn from_letter(letter: char) -> Option<Category> {
        match letter {
            'm' => Some(Category::Top),
            'd' => Some(Category::Domestic),
            'b' => Some(Category::Business),
            'e' => Some(Category::Entertainment),
            'w' => Some(Category::World),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Top => "主要",
            Category::Domestic => "国内",
            Category::Business => "経済",
            Category::Entertainment => "エンタメ",
            Category::World => "国際",
        }
    }

    /// Path of the full listing, relative to the portal root.
    pub fn topics_path(&self) -> &'static str {
        match self {
            Category::Top => "topics/top-picks",
            Category::Domestic => "topics/domestic",
            Category::Business => "topics/business",
            Category::Entertainment => "topics/entertainment",
            Category::World => "topics/world",
        }
    }

    /// Path of the category front page, relative to the portal root.
    pub fn digest_path(&self) -> &'static str {
        match self {
            Category::Top => "",
            Category::Domestic => "categories/domestic",
            Category::Business => "categories/business",
            Category::Entertainment => "categories/entertainment",
            Category::World => "categories/world",
        }
    }
}

/// Parses a letter string such as `"me"` or `"m, b"` into categories, in the
/// order typed. Whitespace and commas are ignored.
pub fn parse_categories(input: &str) -> Result<Vec<Category>, NewsError> {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| Category::from_letter(c).ok_or(NewsError::UnknownCategory(c)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub url: String,
}

/// Formats one category's block: a title line and one padded line per
/// headline. The block ends in a newline, so printing it leaves a blank line.
pub fn render_category(category: Category, headlines: &[Headline]) -> String {
    let mut out = format!("＝＝＝{}＝＝＝\n", category.label());
    for headline in headlines {
        out.push_str(&text_align(&headline.title, HEADLINE_WIDTH, Align::Left, ' '));
        out.push('[');
        out.push_str(&headline.url);
        out.push_str("]\n");
    }
    out
}

/// HTTP side of the digest.
pub struct NewsClient {
    client: Client,
    base_url: Url,
    pause: Duration,
}

impl NewsClient {
    pub fn new(base_url: &str, pause: Duration) -> Result<Self, NewsError> {
        // Joining relative paths needs a trailing slash on the root
        let mut root = base_url.trim_end_matches('/').to_string();
        root.push('/');
        Ok(NewsClient {
            client: Client::new(),
            base_url: Url::parse(&root)?,
            pause,
        })
    }

    async fn fetch(&self, url: &Url) -> Result<(StatusCode, String), NewsError> {
        info!("Fetching {}", url);
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{} answered {} with {} bytes", url, status, body.len());
        tokio::time::sleep(self.pause).await;
        Ok((status, body))
    }

    /// Downloads robots.txt and checks the paths the digest reads.
    ///
    /// A 401/403 answer disallows everything, any other 4xx allows everything,
    /// and a 5xx answer disallows everything.
    pub async fn check_robots(&self) -> Result<(), NewsError> {
        let robots_url = self.base_url.join("robots.txt")?;
        let (status, body) = self.fetch(&robots_url).await?;

        let policy = if status.is_success() {
            RobotsPolicy::parse(&body)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            RobotsPolicy::parse("User-agent: *\nDisallow: /\n")
        } else if status.is_client_error() {
            RobotsPolicy::default()
        } else {
            warn!("robots.txt answered {}, treating as disallowed", status);
            RobotsPolicy::parse("User-agent: *\nDisallow: /\n")
        };

        let denied: Vec<String> = CHECKED_PATHS
            .iter()
            .filter(|path| !policy.is_allowed("*", path))
            .map(|path| format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path))
            .collect();

        if denied.is_empty() {
            Ok(())
        } else {
            Err(NewsError::Disallowed(denied))
        }
    }

    /// Full headline listing of one category.
    pub async fn topics(&self, category: Category) -> Result<Vec<Headline>, NewsError> {
        let url = self.base_url.join(category.topics_path())?;
        let (_, body) = self.fetch(&url).await?;
        parse_topics_page(&body, &url)
    }

    /// Condensed headline digest of one category.
    pub async fn digest(&self, category: Category) -> Result<Vec<Headline>, NewsError> {
        let url = self.base_url.join(category.digest_path())?;
        let (_, body) = self.fetch(&url).await?;
        parse_digest_page(&body, &url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_keeps_order() {
        let categories = parse_categories("me, b").unwrap();
        assert_eq!(
            categories,
            vec![Category::Top, Category::Entertainment, Category::Business]
        );
    }

    #[test]
    fn test_parse_categories_rejects_unknown_letter() {
        assert!(matches!(
            parse_categories("mx"),
            Err(NewsError::UnknownCategory('x'))
        ));
    }

    #[test]
    fn test_render_category_pads_to_width() {
        let block = render_category(
            Category::World,
            &[Headline {
                title: "日本".to_string(),
                url: "https://example.com/1".to_string(),
            }],
        );
        let mut lines = block.lines();
        assert_eq!(lines.next(), Some("＝＝＝国際＝＝＝"));
        let line = lines.next().unwrap();
        assert!(line.starts_with("日本"));
        assert!(line.ends_with("[https://example.com/1]"));
        assert_eq!(display_width(line.split('[').next().unwrap()), HEADLINE_WIDTH);
    }

    #[test]
    fn test_client_joins_category_paths() {
        let client = NewsClient::new("https://news.yahoo.co.jp", Duration::ZERO).unwrap();
        assert_eq!(
            client.base_url.join(Category::Top.digest_path()).unwrap().as_str(),
            "https://news.yahoo.co.jp/"
        );
        assert_eq!(
            client.base_url.join(Category::Business.topics_path()).unwrap().as_str(),
            "https://news.yahoo.co.jp/topics/business"
        );
    }
}
