//! Video identifier extraction from pasted links.
//!
//! Every accepted link shape has one matcher. Matchers run in the order they
//! are declared in [`MATCHERS`] and the first one that captures an identifier
//! wins, so the common watch form is always tried before broader shapes.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::config::{EMBED_URL_BASE, WATCH_URL_BASE};

/// An 11-character video identifier (`A-Z`, `a-z`, `0-9`, `-`, `_`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts `raw` only when it is exactly a well-formed identifier.
    pub fn parse(raw: &str) -> Option<Self> {
        is_valid_id(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn embed_url(&self) -> String {
        format!("{}{}", EMBED_URL_BASE, self.0)
    }

    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_BASE, self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recognised link layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkShape {
    pub name: &'static str,
    pattern: &'static str,
}

/// Link layouts in evaluation order.
pub const MATCHERS: &[LinkShape] = &[
    LinkShape {
        name: "watch",
        pattern: r"(?:youtube\.com/watch\?.*[?&]v=|youtube\.com/watch\?v=)([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "short",
        pattern: r"youtu\.be/([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "embed",
        pattern: r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "shorts",
        pattern: r"youtube\.com/shorts/([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "live",
        pattern: r"youtube\.com/live/([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "v",
        pattern: r"youtube\.com/v/([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "mobile",
        pattern: r"m\.youtube\.com/watch\?.*[?&]v=([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "watch_path",
        pattern: r"youtube\.com/watch/([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "attribution",
        pattern: r"youtube\.com/attribution_link\?.*[?&]u=.*watch%3Fv%3D([A-Za-z0-9_-]{11})",
    },
    LinkShape {
        name: "nocookie",
        pattern: r"youtube-nocookie\.com/embed/([A-Za-z0-9_-]{11})",
    },
];

static COMPILED: LazyLock<Vec<(&'static LinkShape, Regex)>> = LazyLock::new(|| {
    MATCHERS
        .iter()
        .map(|shape| (shape, Regex::new(shape.pattern).unwrap()))
        .collect()
});

fn is_valid_id(s: &str) -> bool {
    s.len() == 11
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the video identifier from a link, or `None` when no known shape matches.
pub fn resolve(url: &str) -> Option<VideoId> {
    resolve_with_shape(url).map(|(id, _)| id)
}

/// Like [`resolve`], also reporting which link shape produced the identifier.
pub fn resolve_with_shape(url: &str) -> Option<(VideoId, &'static LinkShape)> {
    if url.trim().is_empty() {
        return None;
    }

    COMPILED.iter().find_map(|(shape, re)| {
        let id = re.captures(url)?.get(1)?.as_str();
        Some((VideoId(id.to_string()), *shape))
    })
}

/// Canonical embed reference for a link, if it resolves.
pub fn embed_url(url: &str) -> Option<String> {
    resolve(url).map(|id| id.embed_url())
}
