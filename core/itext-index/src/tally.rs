use std::collections::HashMap;

/// Count of annotations per source text.
///
/// Iteration follows the order in which sources were first seen. Use
/// [`SourceTally::sorted`] for the order shown in the source list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTally {
    entries: Vec<(String, usize)>,
    index_map: HashMap<String, usize>,
}

impl SourceTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: &str) {
        match self.index_map.get(source) {
            Some(&idx) => self.entries[idx].1 += 1,
            None => {
                self.index_map.insert(source.to_string(), self.entries.len());
                self.entries.push((source.to_string(), 1));
            }
        }
    }

    pub fn get(&self, source: &str) -> Option<usize> {
        self.index_map.get(source).map(|&idx| self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(s, n)| (s.as_str(), *n))
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    /// Entries ordered by source name.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = self.iter().collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Sum of all counts; equals the number of records tallied.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for SourceTally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = SourceTally::new();
        for source in iter {
            tally.add(source);
        }
        tally
    }
}
