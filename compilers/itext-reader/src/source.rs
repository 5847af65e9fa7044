use itext_feed::{decode_feed, FeedLocator};
use itext_index::TextStore;
use itext_protocol::{Itext, PassageQuery, TextUnit};

use crate::error::PageError;

/// Answers passage queries (the text-unit endpoint).
pub trait TextSource {
    fn passage(&self, query: &PassageQuery) -> Result<Vec<TextUnit>, PageError>;
}

/// Supplies the annotation rows of a published sheet.
pub trait AnnotationSource {
    fn annotations(&self, locator: &FeedLocator) -> Result<Vec<Itext>, PageError>;
}

impl TextSource for TextStore {
    fn passage(&self, query: &PassageQuery) -> Result<Vec<TextUnit>, PageError> {
        Ok(TextStore::passage(self, query)?.into_iter().cloned().collect())
    }
}

/// A feed document already fetched by the host, e.g. read from disk.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    json: String,
}

impl StaticFeed {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl AnnotationSource for StaticFeed {
    fn annotations(&self, _locator: &FeedLocator) -> Result<Vec<Itext>, PageError> {
        Ok(decode_feed(&self.json)?)
    }
}
