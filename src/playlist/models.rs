use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resolver;

/// A stored playlist entry. `embed_url` is always derived from `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub embed_url: String,
}

impl PlaylistEntry {
    /// Builds an entry with a fresh id, or `None` when `url` does not resolve.
    pub fn new(url: &str, title: String) -> Option<Self> {
        let embed_url = resolver::embed_url(url)?;
        Some(Self {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            title,
            embed_url,
        })
    }

    /// Recomputes `embed_url` from `url`; `None` when the url no longer resolves.
    pub(crate) fn revalidated(mut self) -> Option<Self> {
        self.embed_url = resolver::embed_url(&self.url)?;
        Some(self)
    }
}

/// Partial update for an existing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
}

impl EntryUpdate {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            title: None,
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            url: None,
            title: Some(title.into()),
        }
    }
}
