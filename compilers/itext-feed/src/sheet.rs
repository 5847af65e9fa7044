use itext_protocol::Itext;
use serde::Deserialize;
use tracing::info;

use crate::error::FeedError;

/// Where an annotation sheet is published.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedLocator {
    pub key: String,
    /// 1-based worksheet index.
    #[serde(default = "default_worksheet")]
    pub worksheet: u32,
}

fn default_worksheet() -> u32 {
    1
}

impl FeedLocator {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            worksheet: default_worksheet(),
        }
    }

    pub fn with_worksheet(mut self, worksheet: u32) -> Self {
        self.worksheet = worksheet;
        self
    }

    /// Public list-feed URL, JSON flavour.
    pub fn url(&self) -> String {
        format!(
            "https://spreadsheets.google.com/feeds/list/{}/{}/public/full?alt=json",
            self.key, self.worksheet
        )
    }
}

// Wire shape of the list feed: every column is an object holding its text under `$t`.

#[derive(Debug, Default, Deserialize)]
struct FeedDocument {
    #[serde(default)]
    feed: FeedBody,
}

#[derive(Debug, Default, Deserialize)]
struct FeedBody {
    #[serde(default)]
    entry: Vec<FeedRow>,
}

#[derive(Debug, Default, Deserialize)]
struct Cell {
    #[serde(rename = "$t", default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedRow {
    #[serde(rename = "gsx$source")]
    source: Option<Cell>,
    #[serde(rename = "gsx$sourcestart")]
    source_start: Option<Cell>,
    #[serde(rename = "gsx$sourcestop")]
    source_stop: Option<Cell>,
    #[serde(rename = "gsx$target")]
    target: Option<Cell>,
    #[serde(rename = "gsx$targetstart")]
    target_start: Option<Cell>,
    #[serde(rename = "gsx$targetstop")]
    target_stop: Option<Cell>,
    #[serde(rename = "gsx$targettext")]
    target_text: Option<Cell>,
    #[serde(rename = "gsx$addedby")]
    added_by: Option<Cell>,
    #[serde(rename = "gsx$auth")]
    auth: Option<Cell>,
    #[serde(rename = "gsx$note")]
    note: Option<Cell>,
}

fn text(cell: Option<Cell>) -> String {
    cell.and_then(|c| c.text).unwrap_or_default()
}

impl From<FeedRow> for Itext {
    fn from(row: FeedRow) -> Self {
        Itext {
            source: text(row.source),
            source_start: text(row.source_start),
            source_stop: text(row.source_stop),
            target: text(row.target),
            target_start: text(row.target_start),
            target_stop: text(row.target_stop),
            target_text: text(row.target_text),
            note: text(row.note),
            auth: text(row.auth),
            added_by: text(row.added_by),
        }
    }
}

/// Decodes a list-feed JSON document into annotation records, in sheet order.
pub fn decode_feed(json: &str) -> Result<Vec<Itext>, FeedError> {
    let doc: FeedDocument = serde_json::from_str(json)?;
    let itexts: Vec<Itext> = doc.feed.entry.into_iter().map(Itext::from).collect();
    info!(count = itexts.len(), "decoded annotation feed");
    Ok(itexts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rows_and_blank_cells() {
        let json = r#"{
            "feed": {
                "entry": [
                    {
                        "gsx$source": {"$t": "ovid.metamorphoses"},
                        "gsx$sourcestart": {"$t": "1.89"},
                        "gsx$sourcestop": {"$t": "1.112"},
                        "gsx$target": {"$t": "vergil.georgics"},
                        "gsx$targetstart": {"$t": "1.125"},
                        "gsx$targetstop": {"$t": "1.128"},
                        "gsx$targettext": {"$t": "ante Iovem"},
                        "gsx$addedby": {"$t": "M. Dupont"},
                        "gsx$auth": {"$t": "Thomas 1988"},
                        "gsx$note": {"$t": "golden age"}
                    },
                    {
                        "gsx$source": {"$t": "lucretius.de_rerum_natura"},
                        "gsx$targetstart": {"$t": "1.1"},
                        "gsx$note": {}
                    }
                ]
            }
        }"#;

        let itexts = decode_feed(json).unwrap();
        assert_eq!(itexts.len(), 2);
        assert_eq!(itexts[0].source, "ovid.metamorphoses");
        assert_eq!(itexts[0].target_stop, "1.128");
        assert_eq!(itexts[0].added_by, "M. Dupont");
        assert_eq!(itexts[0].auth, "Thomas 1988");
        assert_eq!(itexts[1].target_start, "1.1");
        assert_eq!(itexts[1].target_stop, "");
        assert_eq!(itexts[1].note, "");
    }

    #[test]
    fn test_sheet_without_entries_is_empty() {
        assert!(decode_feed(r#"{"feed": {}}"#).unwrap().is_empty());
        assert!(decode_feed("{}").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_feed_is_an_error() {
        assert!(matches!(decode_feed("{\"feed\":"), Err(FeedError::Json(_))));
    }

    #[test]
    fn test_locator_url() {
        let locator = FeedLocator::new("abc123");
        assert_eq!(
            locator.url(),
            "https://spreadsheets.google.com/feeds/list/abc123/1/public/full?alt=json"
        );
        assert_eq!(locator.with_worksheet(3).worksheet, 3);

        let parsed: FeedLocator = serde_json::from_str(r#"{"key": "abc123"}"#).unwrap();
        assert_eq!(parsed.worksheet, 1);
    }
}
