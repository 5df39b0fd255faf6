use regex::Regex;
use std::sync::LazyLock;

static LIST_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").unwrap());
static CHANNEL_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/channel/([A-Za-z0-9_-]+)").unwrap());
static RAW_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{6,}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Playlist(String),
    Channel(String),
}

impl FeedSource {
    /// Recognises, in order: a `list=` parameter, a `/channel/<id>` segment,
    /// then a bare playlist id of six or more id-safe characters.
    pub fn detect(input: &str) -> Option<Self> {
        let input = input.trim();

        if let Some(caps) = LIST_PARAM_RE.captures(input) {
            return Some(FeedSource::Playlist(caps[1].to_string()));
        }

        if let Some(caps) = CHANNEL_PATH_RE.captures(input) {
            return Some(FeedSource::Channel(caps[1].to_string()));
        }

        if RAW_ID_RE.is_match(input) {
            return Some(FeedSource::Playlist(input.to_string()));
        }

        None
    }

    pub fn feed_url(&self, base_url: &str) -> String {
        match self {
            FeedSource::Playlist(id) => format!("{}?playlist_id={}", base_url, id),
            FeedSource::Channel(id) => format!("{}?channel_id={}", base_url, id),
        }
    }
}

/// Feed URL for a playlist/channel link or raw playlist id.
pub fn locate(input: &str, base_url: &str) -> Option<String> {
    FeedSource::detect(input).map(|source| source.feed_url(base_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FEED_BASE_URL;

    #[test]
    fn test_playlist_param() {
        assert_eq!(
            locate(
                "https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf",
                FEED_BASE_URL
            )
            .as_deref(),
            Some("https://www.youtube.com/feeds/videos.xml?playlist_id=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf")
        );

        // list= wins even when a video is also selected
        assert_eq!(
            FeedSource::detect("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL12345678"),
            Some(FeedSource::Playlist("PL12345678".to_string()))
        );
    }

    #[test]
    fn test_channel_path() {
        assert_eq!(
            locate(
                "https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw/videos",
                FEED_BASE_URL
            )
            .as_deref(),
            Some("https://www.youtube.com/feeds/videos.xml?channel_id=UCuAXFkgsw1L7xaCfnd5JJOw")
        );
    }

    #[test]
    fn test_raw_id() {
        assert_eq!(
            FeedSource::detect("  PLabc_12-xyz "),
            Some(FeedSource::Playlist("PLabc_12-xyz".to_string()))
        );
    }

    #[test]
    fn test_unrecognised() {
        assert_eq!(locate("", FEED_BASE_URL), None);
        assert_eq!(locate("abc12", FEED_BASE_URL), None);
        assert_eq!(locate("https://www.youtube.com/@someone", FEED_BASE_URL), None);
        assert_eq!(locate("two words here", FEED_BASE_URL), None);
    }

    #[test]
    fn test_custom_base() {
        assert_eq!(
            FeedSource::Channel("UC1".to_string()).feed_url("http://localhost:8080/feed"),
            "http://localhost:8080/feed?channel_id=UC1"
        );
    }
}
