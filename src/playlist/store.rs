use std::sync::Arc;

use super::models::{EntryUpdate, PlaylistEntry};
use super::share;
use crate::config::STORAGE_KEY;
use crate::feed::{self, FeedFetcher, FeedRecord};
use crate::resolver;
use crate::storage::KeyValueStore;
use crate::title::TitleResolver;

/// The ordered playlist and its persistence.
///
/// Loaded once from storage on construction; every successful mutation writes
/// the whole sequence back before returning. Mutations take `&mut self`, so
/// one must complete before the next can start.
pub struct PlaylistStore {
    entries: Vec<PlaylistEntry>,
    storage: Arc<dyn KeyValueStore>,
    titles: TitleResolver,
    feeds: FeedFetcher,
}

impl PlaylistStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, titles: TitleResolver, feeds: FeedFetcher) -> Self {
        let entries = Self::load(storage.as_ref());
        log::info!("Loaded {} playlist entries", entries.len());

        Self {
            entries,
            storage,
            titles,
            feeds,
        }
    }

    fn load(storage: &dyn KeyValueStore) -> Vec<PlaylistEntry> {
        let bytes = match storage.get(STORAGE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("Error loading playlist from storage: {}", e);
                return Vec::new();
            }
        };

        let stored: Vec<PlaylistEntry> = match serde_json::from_slice(&bytes) {
            Ok(stored) => stored,
            Err(e) => {
                log::error!("Stored playlist is corrupt, starting empty: {}", e);
                return Vec::new();
            }
        };

        let total = stored.len();
        let entries: Vec<PlaylistEntry> = stored
            .into_iter()
            .filter_map(PlaylistEntry::revalidated)
            .collect();
        if entries.len() < total {
            log::warn!(
                "Dropped {} stored entries whose URL no longer resolves",
                total - entries.len()
            );
        }
        entries
    }

    /// Failures are logged; the in-memory playlist stays authoritative.
    fn save(&self) {
        let result = serde_json::to_vec(&self.entries)
            .map_err(Into::into)
            .and_then(|bytes| self.storage.set(STORAGE_KEY, &bytes));

        if let Err(e) = result {
            log::error!("Error saving playlist to storage: {}", e);
        }
    }

    pub fn items(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PlaylistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Appends `url`. Without a title the oEmbed lookup supplies one.
    pub async fn add_entry(&mut self, url: &str, title: Option<&str>) -> bool {
        let Some((video_id, shape)) = resolver::resolve_with_shape(url) else {
            log::info!("Rejected unresolvable URL: {}", url);
            return false;
        };
        log::debug!("Matched {} link for video {}", shape.name, video_id);

        let title = match explicit_title(title) {
            Some(title) => title,
            None => self.titles.resolve_title(url).await,
        };

        let Some(entry) = PlaylistEntry::new(url, title) else {
            return false;
        };
        log::info!("Added entry {} ({})", entry.id, entry.embed_url);

        self.entries.push(entry);
        self.save();
        true
    }

    /// Updates in place. A new url without a title triggers a fresh lookup.
    pub async fn update_entry(&mut self, id: &str, update: EntryUpdate) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        let mut updated = self.entries[index].clone();
        let title = explicit_title(update.title.as_deref());

        if let Some(url) = update.url {
            let Some(video_id) = resolver::resolve(&url) else {
                log::info!("Rejected update with unresolvable URL: {}", url);
                return false;
            };
            updated.embed_url = video_id.embed_url();

            if title.is_none() {
                updated.title = self.titles.resolve_title(&url).await;
            }
            updated.url = url;
        }

        if let Some(title) = title {
            updated.title = title;
        }

        self.entries[index] = updated;
        self.save();
        true
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        self.entries.remove(index);
        self.save();
        true
    }

    /// Moves the entry at `from` so that it ends up at `to`.
    pub fn reorder_entries(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from >= len || to >= len {
            return false;
        }

        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        self.save();
        true
    }

    /// Replaces the whole playlist with the records whose URL resolves, each
    /// under a fresh id. Returns how many were admitted.
    pub fn replace_all(&mut self, records: Vec<FeedRecord>) -> usize {
        let found = records.len();
        let entries: Vec<PlaylistEntry> = records
            .into_iter()
            .filter_map(|record| PlaylistEntry::new(&record.url, record.title))
            .collect();

        if entries.len() < found {
            log::info!(
                "Dropped {} of {} records with unresolvable URLs",
                found - entries.len(),
                found
            );
        }

        let admitted = entries.len();
        self.entries = entries;
        self.save();
        admitted
    }

    /// Replaces the playlist from a playlist/channel feed. Returns the number
    /// of records found, which is 0 for unrecognised input, an unreachable
    /// feed and an empty feed alike; the playlist is untouched in those cases.
    pub async fn ingest_from_playlist_url(&mut self, playlist_url: &str) -> usize {
        let Some(feed_url) = feed::locate(playlist_url, self.feeds.base_url()) else {
            log::info!("No playlist or channel recognised in: {}", playlist_url);
            return 0;
        };

        let Some(raw) = self.feeds.fetch(&feed_url).await else {
            return 0;
        };

        let records = feed::parse(&raw);
        let found = records.len();
        if found > 0 {
            let admitted = self.replace_all(records);
            log::info!("Imported {} of {} feed records", admitted, found);
        }
        found
    }

    /// Shareable encoding of the `{url, title}` pairs; empty on failure.
    pub fn serialize(&self) -> String {
        let records: Vec<FeedRecord> = self
            .entries
            .iter()
            .map(|e| FeedRecord {
                url: e.url.clone(),
                title: e.title.clone(),
            })
            .collect();

        share::encode(&records).unwrap_or_else(|e| {
            log::error!("Failed to serialize playlist: {}", e);
            String::new()
        })
    }

    /// Replaces the playlist from a [`serialize`](Self::serialize) value.
    /// Returns the number of admitted entries; undecodable input changes nothing.
    pub fn load_shared(&mut self, encoded: &str) -> usize {
        match share::decode(encoded) {
            Ok(records) => self.replace_all(records),
            Err(e) => {
                log::warn!("Ignoring shared playlist: {}", e);
                0
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
    }
}

fn explicit_title(title: Option<&str>) -> Option<String> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
