use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::playlist::{EntryUpdate, PlaylistStore};

#[derive(Parser, Debug)]
#[command(name = "tubeshelf")]
#[command(about = "Keep an ordered playlist of YouTube links", long_about = None)]
pub struct Cli {
    /// Directory holding config.json and the stored playlist
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the playlist in order
    List,
    /// Append a video link
    Add {
        url: String,
        /// Skip the title lookup and use this label
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Change the link and/or title of an entry
    Edit {
        id: String,
        #[arg(short, long)]
        url: Option<String>,
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Remove an entry
    Remove { id: String },
    /// Move the entry at FROM to position TO (zero-based)
    Move { from: usize, to: usize },
    /// Replace the playlist with the videos of a playlist or channel feed
    Import { playlist_url: String },
    /// Print a shareable encoding of the playlist
    Share {
        /// Prefix for the encoded value, e.g. "https://example.com/?p="
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Replace the playlist from a shared encoding
    Load { encoded: String },
    /// Remove every entry
    Clear {
        /// Confirm clearing the playlist
        #[arg(long)]
        yes: bool,
    },
}

pub async fn execute(store: &mut PlaylistStore, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::List => {
            if store.is_empty() {
                writeln!(out, "Playlist is empty")?;
            }
            for (idx, entry) in store.items().iter().enumerate() {
                writeln!(out, "{:>3}  {}  {}", idx, entry.id, entry.title)?;
                writeln!(out, "     {}", entry.embed_url)?;
            }
        }
        Command::Add { url, title } => {
            if !store.add_entry(&url, title.as_deref()).await {
                bail!("Not a recognised YouTube video link: {}", url);
            }
            if let Some(entry) = store.items().last() {
                writeln!(out, "Added {}  {}", entry.id, entry.title)?;
            }
        }
        Command::Edit { id, url, title } => {
            if url.is_none() && title.is_none() {
                bail!("Nothing to change: pass --url and/or --title");
            }
            if !store.update_entry(&id, EntryUpdate { url, title }).await {
                bail!("No entry {} or the new link is not a recognised video", id);
            }
            writeln!(out, "Updated {}", id)?;
        }
        Command::Remove { id } => {
            if !store.delete_entry(&id) {
                bail!("No entry {}", id);
            }
            writeln!(out, "Removed {}", id)?;
        }
        Command::Move { from, to } => {
            if store.is_empty() {
                bail!("Playlist is empty, nothing to move");
            }
            if !store.reorder_entries(from, to) {
                bail!(
                    "Positions must be between 0 and {}",
                    store.len().saturating_sub(1)
                );
            }
            writeln!(out, "Moved {} -> {}", from, to)?;
        }
        Command::Import { playlist_url } => {
            let found = store.ingest_from_playlist_url(&playlist_url).await;
            if found == 0 {
                writeln!(
                    out,
                    "No videos found. The link may not be a playlist or channel, \
                     or the feed could not be reached (proxies can be blocked)."
                )?;
            } else {
                writeln!(
                    out,
                    "Found {} videos, playlist now has {} entries",
                    found,
                    store.len()
                )?;
            }
        }
        Command::Share { base_url } => {
            let encoded = store.serialize();
            if encoded.is_empty() {
                bail!("Could not encode the playlist");
            }
            writeln!(out, "{}{}", base_url.unwrap_or_default(), encoded)?;
        }
        Command::Load { encoded } => {
            let admitted = store.load_shared(&encoded);
            writeln!(out, "Loaded {} entries", admitted)?;
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear without --yes; save a share link first");
            }
            store.clear();
            writeln!(out, "Playlist cleared")?;
        }
    }
    Ok(())
}
