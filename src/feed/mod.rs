//! Bulk discovery of videos from playlist and channel feeds.

pub mod fetcher;
pub mod locator;
pub mod parser;

use serde::{Deserialize, Serialize};

pub use fetcher::FeedFetcher;
pub use locator::{locate, FeedSource};
pub use parser::parse;

/// A `(url, title)` pair read from a feed or a share link. It only becomes a
/// playlist entry once its URL resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub url: String,
    pub title: String,
}
