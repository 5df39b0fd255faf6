//! Shareable playlist links.
//!
//! A share value is the JSON array of `{url, title}` pairs, base64-encoded
//! from its UTF-8 bytes and then percent-encoded so it can sit in a single
//! query-string parameter.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::config::FALLBACK_TITLE;
use crate::errors::AppError;
use crate::feed::FeedRecord;

#[derive(Deserialize)]
struct SharedItem {
    url: String,
    #[serde(default)]
    title: Option<String>,
}

pub fn encode(records: &[FeedRecord]) -> Result<String, AppError> {
    let json = serde_json::to_string(records)?;
    let b64 = general_purpose::STANDARD.encode(json.as_bytes());
    Ok(urlencoding::encode(&b64).into_owned())
}

/// Reverses [`encode`]. Records are returned unvalidated; a missing or blank
/// title becomes the fallback label.
pub fn decode(encoded: &str) -> Result<Vec<FeedRecord>, AppError> {
    let b64 = urlencoding::decode(encoded.trim())
        .map_err(|e| AppError::Parse(format!("Invalid percent-encoding: {}", e)))?;
    let bytes = general_purpose::STANDARD
        .decode(b64.as_bytes())
        .map_err(|e| AppError::Parse(format!("Invalid base64: {}", e)))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| AppError::Parse(format!("Invalid UTF-8: {}", e)))?;
    let items: Vec<SharedItem> = serde_json::from_str(&json)?;

    Ok(items
        .into_iter()
        .map(|item| FeedRecord {
            url: item.url,
            title: item
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        })
        .collect())
}
