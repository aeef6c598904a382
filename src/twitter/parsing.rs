//! Text helpers for tweet content.

/// Extracts the original author's handle from retweet text such as
/// `"RT @alice: some text"`.
///
/// # Returns
///
/// - `Some("@alice")`: If the text starts with the retweet marker
/// - `None`: For any other text
pub fn extract_retweeted_handle(text: &str) -> Option<&str> {
    // Handles are at most 15 word characters
    let re = regex::Regex::new(r"^RT (@[A-Za-z0-9_]{1,15}): ").ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Collapses a retweet body to a short placeholder naming the original author.
/// Non-retweet text is returned unchanged.
pub fn collapse_retweet(text: &str) -> String {
    match extract_retweeted_handle(text) {
        Some(handle) => format!("RT {}: ～", handle),
        None => text.to_string(),
    }
}

/// Permalink of a tweet.
pub fn tweet_url(username: &str, tweet_id: &str) -> String {
    format!("https://twitter.com/{}/status/{}", username, tweet_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_retweeted_handle() {
        assert_eq!(extract_retweeted_handle("RT @alice: some text"), Some("@alice"));
        assert_eq!(extract_retweeted_handle("RT @a_b_9: x: y"), Some("@a_b_9"));
        assert_eq!(extract_retweeted_handle("RT alice: some text"), None);
        assert_eq!(extract_retweeted_handle("hello RT @alice: text"), None);
        assert_eq!(extract_retweeted_handle("RT @alice"), None);
    }

    #[test]
    fn test_collapse_retweet_drops_body() {
        let collapsed = collapse_retweet("RT @alice: some text");
        assert_eq!(collapsed, "RT @alice: ～");
        assert!(collapsed.contains("@alice"));
        assert!(!collapsed.contains("some text"));
    }

    #[test]
    fn test_collapse_retweet_keeps_plain_text() {
        assert_eq!(collapse_retweet("RTX 4090 is out"), "RTX 4090 is out");
        assert_eq!(collapse_retweet("日本語のツイート #話題"), "日本語のツイート #話題");
    }

    #[test]
    fn test_tweet_url() {
        assert_eq!(
            tweet_url("alice", "1790000000000000001"),
            "https://twitter.com/alice/status/1790000000000000001"
        );
    }
}
