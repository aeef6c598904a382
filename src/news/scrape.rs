//! HTML extraction of headline lists.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::Headline;
use crate::error::NewsError;

/// Marker some headlines carry when the article is the portal's own.
const ORIGINAL_SUFFIX: &str = "オリジナル";

fn selector(css: &'static str) -> Result<Selector, NewsError> {
    Selector::parse(css).map_err(|e| NewsError::Selector(format!("{}: {:?}", css, e)))
}

fn clean_title(raw: &str) -> String {
    let title = raw.trim();
    title.strip_suffix(ORIGINAL_SUFFIX).unwrap_or(title).to_string()
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Parses a per-category topics page (`/topics/<slug>`).
///
/// Items without a link are skipped; a missing feed container, list or item
/// title is a structural error.
pub fn parse_topics_page(html: &str, page_url: &Url) -> Result<Vec<Headline>, NewsError> {
    let document = Html::parse_document(html);
    let feed_sel = selector("div.newsFeed")?;
    let list_sel = selector("ul.newsFeed_list")?;
    let item_sel = selector("li.newsFeed_item")?;
    let link_sel = selector("a")?;
    let title_sel = selector("div.newsFeed_item_title")?;

    let feed = document
        .select(&feed_sel)
        .next()
        .ok_or(NewsError::MissingElement("div_tag.newsFeed"))?;
    let list = feed
        .select(&list_sel)
        .next()
        .ok_or(NewsError::MissingElement("ul_tag"))?;

    let mut headlines = Vec::new();
    for item in list.select(&item_sel) {
        let Some(link) = item.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let title = link
            .select(&title_sel)
            .next()
            .ok_or(NewsError::MissingElement("div_tag.newsFeed_item_title"))?;
        headlines.push(Headline {
            title: clean_title(&text_of(title)),
            url: resolve(page_url, href),
        });
    }
    Ok(headlines)
}

/// Parses the condensed topic list at the top of a category front page.
pub fn parse_digest_page(html: &str, page_url: &Url) -> Result<Vec<Headline>, NewsError> {
    let document = Html::parse_document(html);
    let block_sel = selector("#uamods-topics > div > div > div")?;
    let list_sel = selector("ul")?;
    let item_sel = selector("li")?;
    let link_sel = selector("a")?;

    let block = document
        .select(&block_sel)
        .next()
        .ok_or(NewsError::MissingElement("div_tag"))?;
    let list = block
        .select(&list_sel)
        .next()
        .ok_or(NewsError::MissingElement("ul_tag"))?;

    let headlines = list
        .select(&item_sel)
        .filter_map(|item| item.select(&link_sel).next())
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            Some(Headline {
                title: clean_title(&text_of(link)),
                url: resolve(page_url, href),
            })
        })
        .collect();
    Ok(headlines)
}
