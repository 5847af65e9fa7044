use std::collections::HashMap;

use itext_locus::{standardize, QUERY_SEPARATOR};
use itext_protocol::{Corpus, PassageQuery, Text, TextUnit, UnitId};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Can't find text {0}")]
    TextNotFound(String),
    #[error("Can't find loc {loc} in text {name}")]
    LocNotFound { loc: String, name: String },
    #[error("Can't find id {id} in text {name}")]
    IdNotFound { id: u32, name: String },
}

impl StoreError {
    /// Status the text endpoint answers with for this error.
    pub fn http_status(&self) -> u16 {
        404
    }
}

/// Endpoint path for a passage request, e.g. `/query/vergil.georgics/loc/1.1/1.42`.
pub fn query_path(query: &PassageQuery) -> String {
    format!(
        "/query/{}/loc/{}/{}",
        query.name,
        standardize(&query.first, QUERY_SEPARATOR),
        standardize(&query.last, QUERY_SEPARATOR)
    )
}

/// Read-only lookup of text units by name, id and locus.
#[derive(Debug, Clone, Default)]
pub struct TextStore {
    texts: HashMap<String, Text>,
}

impl TextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_corpus(corpus: Corpus) -> Self {
        let mut store = Self::new();
        for text in corpus.texts {
            store.insert(text);
        }
        store
    }

    /// Adds a text, replacing any text already stored under the same name.
    pub fn insert(&mut self, text: Text) {
        debug!(name = %text.name, units = text.units.len(), "stored text");
        self.texts.insert(text.name.clone(), text);
    }

    /// Names of the stored texts, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.texts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn text(&self, name: &str) -> Result<&Text, StoreError> {
        self.texts
            .get(name)
            .ok_or_else(|| StoreError::TextNotFound(name.to_string()))
    }

    /// Units with ids between `first` and `last` inclusive. Reversed bounds are swapped.
    pub fn select_by_id(
        &self,
        name: &str,
        first: UnitId,
        last: Option<UnitId>,
    ) -> Result<Vec<&TextUnit>, StoreError> {
        let text = self.text(name)?;
        let last = last.unwrap_or(first);
        let (first, last) = if last < first { (last, first) } else { (first, last) };

        let max_id = text.units.iter().map(|u| u.id).max();
        for id in [first, last] {
            if max_id.map_or(true, |max| id > max) {
                return Err(StoreError::IdNotFound {
                    id: id.into(),
                    name: name.to_string(),
                });
            }
        }

        Ok(text
            .units
            .iter()
            .filter(|u| u.id >= first && u.id <= last)
            .collect())
    }

    /// Units whose locus is exactly `loc`.
    pub fn select_by_loc(&self, name: &str, loc: &str) -> Result<Vec<&TextUnit>, StoreError> {
        let text = self.text(name)?;
        let units: Vec<&TextUnit> = text.units.iter().filter(|u| u.loc == loc).collect();
        if units.is_empty() {
            return Err(StoreError::LocNotFound {
                loc: loc.to_string(),
                name: name.to_string(),
            });
        }
        Ok(units)
    }

    /// The passage between two loci, resolved through the lowest unit id at each locus.
    pub fn passage(&self, query: &PassageQuery) -> Result<Vec<&TextUnit>, StoreError> {
        let first = self.first_id_at(&query.name, &query.first)?;
        let last = self.first_id_at(&query.name, &query.last)?;
        self.select_by_id(&query.name, first, Some(last))
    }

    fn first_id_at(&self, name: &str, loc: &str) -> Result<UnitId, StoreError> {
        let loc = standardize(loc, QUERY_SEPARATOR);
        let units = self.select_by_loc(name, &loc)?;
        units
            .iter()
            .map(|u| u.id)
            .min()
            .ok_or(StoreError::LocNotFound {
                loc,
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn georgics() -> TextStore {
        let units = ["1.1", "1.2", "1.3", "1.4", "1.5"]
            .iter()
            .enumerate()
            .map(|(i, loc)| TextUnit {
                id: UnitId::new(i as u32),
                loc: loc.to_string(),
                verse: format!("verse {}", loc),
            })
            .collect();
        TextStore::from_corpus(Corpus {
            version: 1,
            texts: vec![Text {
                name: "vergil.georgics".to_string(),
                units,
            }],
        })
    }

    fn query(first: &str, last: &str) -> PassageQuery {
        PassageQuery {
            name: "vergil.georgics".to_string(),
            first: first.to_string(),
            last: last.to_string(),
        }
    }

    #[test]
    fn test_passage_by_loc_range() {
        let store = georgics();
        let units = store.passage(&query("1,2", "1.4")).unwrap();
        let locs: Vec<&str> = units.iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(locs, vec!["1.2", "1.3", "1.4"]);
    }

    #[test]
    fn test_reversed_ids_are_swapped() {
        let store = georgics();
        let units = store
            .select_by_id("vergil.georgics", UnitId::new(3), Some(UnitId::new(1)))
            .unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].loc, "1.2");
    }

    #[test]
    fn test_lookup_errors() {
        let store = georgics();
        assert_eq!(
            store.text("lucan.pharsalia").unwrap_err(),
            StoreError::TextNotFound("lucan.pharsalia".to_string())
        );
        let err = store.passage(&query("2.1", "2.4")).unwrap_err();
        assert_eq!(err.to_string(), "Can't find loc 2.1 in text vergil.georgics");
        assert_eq!(err.http_status(), 404);
        assert!(matches!(
            store.select_by_id("vergil.georgics", UnitId::new(9), None),
            Err(StoreError::IdNotFound { id: 9, .. })
        ));
    }

    #[test]
    fn test_names_sorted_and_replaced() {
        let mut store = georgics();
        store.insert(Text {
            name: "lucan.pharsalia".to_string(),
            units: Vec::new(),
        });
        store.insert(Text {
            name: "vergil.georgics".to_string(),
            units: Vec::new(),
        });
        assert_eq!(store.names(), vec!["lucan.pharsalia", "vergil.georgics"]);
        assert!(store.text("vergil.georgics").unwrap().units.is_empty());
    }

    #[test]
    fn test_query_path_uses_dots() {
        assert_eq!(
            query_path(&query("1,1", "1_42")),
            "/query/vergil.georgics/loc/1.1/1.42"
        );
    }
}
