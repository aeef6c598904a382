//! Twitter/X API integration module.
//!
//! This module contains the client seam for the recent counts and recent search
//! endpoints, their wire types, and text helpers for tweet content.

mod api;
mod models;
mod parsing;

pub use api::{HttpTwitterApi, TwitterApi};
pub use models::{
    CountItem, CountMeta, CountRequest, CountResponse, Includes, SearchMeta, SearchPage,
    SearchRequest, Tweet, User,
};
pub use parsing::{collapse_retweet, extract_retweeted_handle, tweet_url};

pub(crate) use api::sanitize_for_logging;
