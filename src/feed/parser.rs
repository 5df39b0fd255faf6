//! Feed document parsing (Atom `entry` or RSS `item`).
//!
//! Parsing never fails: a document the reader rejects yields no records, and
//! records missing fields fall back as described on [`parse`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

use super::FeedRecord;
use crate::config::FALLBACK_TITLE;
use crate::resolver::VideoId;

static ATOM_VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"yt:video:([A-Za-z0-9_-]{11})").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Atom,
    Rss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Link,
    Id,
    VideoId,
    Title,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"link" => Some(Field::Link),
            b"id" => Some(Field::Id),
            b"yt:videoId" => Some(Field::VideoId),
            b"title" => Some(Field::Title),
            _ => None,
        }
    }
}

/// Fields collected from the direct children of one `entry` or `item`.
#[derive(Debug, Default)]
struct Draft {
    link_href: Option<String>,
    link_text: Option<String>,
    id: Option<String>,
    video_id: Option<String>,
    title: Option<String>,
}

impl Draft {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Link => &mut self.link_text,
            Field::Id => &mut self.id,
            Field::VideoId => &mut self.video_id,
            Field::Title => &mut self.title,
        }
    }

    fn title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(FALLBACK_TITLE)
            .to_string()
    }

    /// Link href or text, else a watch URL rebuilt from the entry id or
    /// `yt:videoId`. Entries without any of these are skipped.
    fn into_atom_record(self) -> Option<FeedRecord> {
        let title = self.title();

        let url = self
            .link_href
            .clone()
            .filter(|href| !href.trim().is_empty())
            .or_else(|| self.link_text.clone())
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty())
            .or_else(|| {
                let id = self.id.as_deref()?;
                let caps = ATOM_VIDEO_ID_RE.captures(id)?;
                Some(VideoId::parse(&caps[1])?.watch_url())
            })
            .or_else(|| {
                let raw = self.video_id.as_deref()?.trim();
                Some(VideoId::parse(raw)?.watch_url())
            })?;

        Some(FeedRecord { url, title })
    }

    /// Items are kept even when the link is empty.
    fn into_rss_record(self) -> FeedRecord {
        let title = self.title();
        let url = self
            .link_text
            .map(|link| link.trim().to_string())
            .unwrap_or_default();
        FeedRecord { url, title }
    }
}

/// An open `entry`/`item` and the child field currently being read.
struct OpenRecord {
    dialect: Dialect,
    depth: usize,
    draft: Draft,
    capture: Option<(Field, usize)>,
    seen: Vec<Field>,
}

impl OpenRecord {
    fn start_child(&mut self, element: &BytesStart<'_>, depth: usize) {
        if depth != self.depth + 1 || self.capture.is_some() {
            return;
        }
        let Some(field) = Field::from_name(element.name().as_ref()) else {
            return;
        };
        // Only the first occurrence of each child counts.
        if self.seen.contains(&field) {
            return;
        }
        self.seen.push(field);

        if field == Field::Link {
            if let Ok(Some(href)) = element.try_get_attribute("href") {
                if let Ok(value) = href.unescape_value() {
                    self.draft.link_href = Some(value.into_owned());
                }
            }
        }

        *self.draft.slot(field) = Some(String::new());
        self.capture = Some((field, depth));
    }

    fn push_text(&mut self, text: &str) {
        if let Some((field, _)) = self.capture {
            if let Some(slot) = self.draft.slot(field).as_mut() {
                slot.push_str(text);
            }
        }
    }

    fn end_child(&mut self, depth: usize) {
        if matches!(self.capture, Some((_, d)) if d == depth) {
            self.capture = None;
        }
    }
}

#[derive(Default)]
struct Scan {
    entries: Vec<Draft>,
    items: Vec<Draft>,
}

impl Scan {
    fn push(&mut self, record: OpenRecord) {
        match record.dialect {
            Dialect::Atom => self.entries.push(record.draft),
            Dialect::Rss => self.items.push(record.draft),
        }
    }
}

fn scan(raw: &str) -> Result<Scan, quick_xml::Error> {
    // Text is left untrimmed so pieces of one field keep their spacing;
    // whole fields are trimmed once collected.
    let mut reader = Reader::from_str(raw);

    let mut scan = Scan::default();
    let mut open: Option<OpenRecord> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match open.as_mut() {
                    Some(record) => record.start_child(&e, depth),
                    None => open = open_record(&e, depth),
                }
            }
            Event::Empty(e) => {
                // Self-closing: opens and closes at depth + 1.
                match open.as_mut() {
                    Some(record) => {
                        record.start_child(&e, depth + 1);
                        record.end_child(depth + 1);
                    }
                    None => {
                        if let Some(empty) = open_record(&e, depth + 1) {
                            scan.push(empty);
                        }
                    }
                }
            }
            Event::Text(e) => {
                if let Some(record) = open.as_mut() {
                    let text = e.unescape()?;
                    record.push_text(&text);
                }
            }
            Event::CData(e) => {
                if let Some(record) = open.as_mut() {
                    record.push_text(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let closes_record = open.as_ref().is_some_and(|r| r.depth == depth);
                if closes_record {
                    if let Some(done) = open.take() {
                        scan.push(done);
                    }
                } else if let Some(record) = open.as_mut() {
                    record.end_child(depth);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(scan)
}

fn open_record(element: &BytesStart<'_>, depth: usize) -> Option<OpenRecord> {
    let dialect = match element.name().as_ref() {
        b"entry" => Dialect::Atom,
        b"item" => Dialect::Rss,
        _ => return None,
    };
    Some(OpenRecord {
        dialect,
        depth,
        draft: Draft::default(),
        capture: None,
        seen: Vec::new(),
    })
}

/// Extract `(url, title)` records in document order.
///
/// Atom `entry` elements are preferred; RSS `item` elements are only used when
/// the document has no entries at all.
pub fn parse(raw: &str) -> Vec<FeedRecord> {
    let scan = match scan(raw) {
        Ok(scan) => scan,
        Err(e) => {
            log::warn!("Feed XML could not be parsed: {}", e);
            return Vec::new();
        }
    };

    if !scan.entries.is_empty() {
        let total = scan.entries.len();
        let records: Vec<FeedRecord> = scan
            .entries
            .into_iter()
            .filter_map(Draft::into_atom_record)
            .collect();
        log::debug!("Parsed {} of {} Atom entries", records.len(), total);
        return records;
    }

    let records: Vec<FeedRecord> = scan.items.into_iter().map(Draft::into_rss_record).collect();
    log::debug!("Parsed {} RSS items", records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, title: &str) -> FeedRecord {
        FeedRecord {
            url: url.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_atom_id_fallback() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry><id>yt:video:abc12345678</id></entry>
        </feed>"#;

        assert_eq!(
            parse(xml),
            vec![record(
                "https://www.youtube.com/watch?v=abc12345678",
                FALLBACK_TITLE
            )]
        );
    }

    #[test]
    fn test_youtube_style_feed() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <link rel="self" href="http://www.youtube.com/feeds/videos.xml?playlist_id=PL1"/>
 <id>yt:playlist:PL1</id>
 <title>My playlist</title>
 <entry>
  <id>yt:video:dQw4w9WgXcQ</id>
  <yt:videoId>dQw4w9WgXcQ</yt:videoId>
  <title>Rock &amp; Roll</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=dQw4w9WgXcQ"/>
  <media:group>
   <media:title>Media title</media:title>
  </media:group>
 </entry>
 <entry>
  <id>yt:video:9bZkp7q19f0</id>
  <title>Second</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=9bZkp7q19f0"/>
 </entry>
</feed>"#;

        assert_eq!(
            parse(xml),
            vec![
                record("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "Rock & Roll"),
                record("https://www.youtube.com/watch?v=9bZkp7q19f0", "Second"),
            ]
        );
    }

    #[test]
    fn test_atom_link_text_and_video_id_fallbacks() {
        let xml = r#"<feed>
            <entry><title>Text link</title><link>https://youtu.be/dQw4w9WgXcQ</link></entry>
            <entry><title>Only videoId</title><id>tag:other</id><yt:videoId>9bZkp7q19f0</yt:videoId></entry>
            <entry><title>Nothing usable</title><id>tag:other</id></entry>
        </feed>"#;

        assert_eq!(
            parse(xml),
            vec![
                record("https://youtu.be/dQw4w9WgXcQ", "Text link"),
                record("https://www.youtube.com/watch?v=9bZkp7q19f0", "Only videoId"),
            ]
        );
    }

    #[test]
    fn test_rss_fallback_keeps_empty_links() {
        let xml = r#"<rss version="2.0"><channel>
            <title>Channel</title>
            <item><title><![CDATA[First <b>one</b>]]></title><link>https://youtu.be/dQw4w9WgXcQ</link></item>
            <item><title></title></item>
            <item><link>https://youtu.be/9bZkp7q19f0</link></item>
        </channel></rss>"#;

        assert_eq!(
            parse(xml),
            vec![
                record("https://youtu.be/dQw4w9WgXcQ", "First <b>one</b>"),
                record("", FALLBACK_TITLE),
                record("https://youtu.be/9bZkp7q19f0", FALLBACK_TITLE),
            ]
        );
    }

    #[test]
    fn test_title_pieces_keep_spacing() {
        let atom = r#"<feed><entry>
            <title type="html">Rock <b>and</b> Roll</title>
            <link href="https://youtu.be/dQw4w9WgXcQ"/>
        </entry></feed>"#;
        assert_eq!(
            parse(atom),
            vec![record("https://youtu.be/dQw4w9WgXcQ", "Rock and Roll")]
        );

        let rss = r#"<rss><channel><item>
            <title>Hello <![CDATA[World]]></title>
            <link>
                https://youtu.be/9bZkp7q19f0
            </link>
        </item></channel></rss>"#;
        assert_eq!(
            parse(rss),
            vec![record("https://youtu.be/9bZkp7q19f0", "Hello World")]
        );
    }

    #[test]
    fn test_entries_take_precedence_over_items() {
        let xml = r#"<root>
            <item><link>https://youtu.be/AAAAAAAAAAA</link></item>
            <entry><link href="https://youtu.be/BBBBBBBBBBB"/></entry>
        </root>"#;

        assert_eq!(
            parse(xml),
            vec![record("https://youtu.be/BBBBBBBBBBB", FALLBACK_TITLE)]
        );
    }

    #[test]
    fn test_malformed_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("definitely not xml").is_empty());
        assert!(parse("<feed><entry><title>x</title></feed>").is_empty());
    }
}
