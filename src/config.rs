use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

pub const STORAGE_KEY: &str = "youtube-urls";
pub const FALLBACK_TITLE: &str = "Untitled Video";

pub const EMBED_URL_BASE: &str = "https://www.youtube.com/embed/";
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";
pub const OEMBED_URL: &str = "https://www.youtube.com/oembed";
pub const FEED_BASE_URL: &str = "https://www.youtube.com/feeds/videos.xml";

pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Proxies tried in order once a direct feed fetch has failed.
pub const DEFAULT_FEED_PROXIES: &[&str] = &[
    "https://corsproxy.io/?",
    "https://api.allorigins.win/raw?url=",
    "https://api.codetabs.com/v1/proxy?quest=",
];

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tubeshelf")
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed_base_url: String,
    pub feed_proxies: Vec<String>,
    /// Proxies for oEmbed title lookups; empty means direct only.
    pub title_proxies: Vec<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_base_url: FEED_BASE_URL.to_string(),
            feed_proxies: DEFAULT_FEED_PROXIES.iter().map(|p| p.to_string()).collect(),
            title_proxies: Vec::new(),
            request_timeout_secs: REQUEST_TIMEOUT_SECONDS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `config.json` from `dir`. A missing file yields defaults; an
    /// unreadable or corrupt one is logged and also yields defaults.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE_NAME);
        match Self::read_file(&path) {
            Ok(Some(config)) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring configuration at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read_file(path: &Path) -> Result<Option<Self>, AppError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        if config.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        config.feed_base_url = config.feed_base_url.trim_end_matches('?').to_string();
        Ok(Some(config))
    }
}
