use itext_feed::FeedLocator;
use itext_locus::DEFAULT_SEPARATOR;
use serde::Deserialize;

use crate::error::PageError;

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

/// Everything needed to bootstrap a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageConfig {
    /// `"<text> <first> <last>"`, as typed by the reader.
    pub passage: String,
    pub feed: FeedLocator,
    /// Separator used when loci are displayed. Defaults to `,`.
    #[serde(default = "default_separator")]
    pub separator: char,
}

impl PageConfig {
    pub fn new(passage: impl Into<String>, feed: FeedLocator) -> Self {
        Self {
            passage: passage.into(),
            feed,
            separator: default_separator(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PageError> {
        serde_json::from_str(json).map_err(|e| PageError::Feed(e.into()))
    }
}

/// How text units are turned into rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowOptions {
    /// Give each row a `verse_id_<id>` element id.
    pub label_id: bool,
    /// Reserve a cell for the annotation badge.
    pub meta_cell: bool,
}

impl RowOptions {
    /// Rows of the target passage: labelled, with a badge cell.
    pub fn target() -> Self {
        Self {
            label_id: true,
            meta_cell: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PageConfig::from_json(
            r#"{"passage": "vergil.georgics 1.1 1.42", "feed": {"key": "abc"}}"#,
        )
        .unwrap();
        assert_eq!(config.separator, ',');
        assert_eq!(config.feed.worksheet, 1);
        assert_eq!(config, PageConfig::new("vergil.georgics 1.1 1.42", FeedLocator::new("abc")));
    }

    #[test]
    fn test_config_rejects_missing_feed() {
        assert!(PageConfig::from_json(r#"{"passage": "x 1 2"}"#).is_err());
    }
}
