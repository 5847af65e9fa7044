use std::collections::BTreeSet;

use itext_locus::LocusRange;
use itext_protocol::Itext;
use tracing::debug;

use crate::tally::SourceTally;

/// Source identifiers currently selected in the source list.
pub type SourceSet = BTreeSet<String>;

/// The annotations loaded for one page view.
///
/// A session is never edited: a reload builds a new one.
#[derive(Debug, Clone, Default)]
pub struct Session {
    itexts: Vec<Itext>,
}

impl Session {
    pub fn new(itexts: Vec<Itext>) -> Self {
        debug!(count = itexts.len(), "built annotation session");
        Self { itexts }
    }

    pub fn itexts(&self) -> &[Itext] {
        &self.itexts
    }

    pub fn len(&self) -> usize {
        self.itexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itexts.is_empty()
    }

    /// Annotations whose target range covers `locus`, in load order.
    ///
    /// Linear in the number of annotations, and called once per displayed
    /// line. Sized for a passage of a few hundred lines against a few
    /// hundred annotations.
    pub fn by_locus(&self, locus: &str) -> Vec<&Itext> {
        self.itexts
            .iter()
            .filter(|itext| target_range(itext).contains(locus))
            .collect()
    }

    pub fn tally(&self) -> SourceTally {
        group_by_source(&self.itexts)
    }

    pub fn sources(&self) -> SourceSet {
        self.itexts.iter().map(|i| i.source.clone()).collect()
    }
}

impl FromIterator<Itext> for Session {
    fn from_iter<I: IntoIterator<Item = Itext>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

pub fn target_range(itext: &Itext) -> LocusRange<'_> {
    LocusRange::new(&itext.target_start, &itext.target_stop)
}

pub fn source_range(itext: &Itext) -> LocusRange<'_> {
    LocusRange::new(&itext.source_start, &itext.source_stop)
}

/// Keeps the records whose source is selected. Nothing is selected, nothing is kept.
pub fn filter_by_source<'a, I>(records: I, sources: &SourceSet) -> Vec<&'a Itext>
where
    I: IntoIterator<Item = &'a Itext>,
{
    if sources.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|itext| sources.contains(&itext.source))
        .collect()
}

pub fn group_by_source<'a, I>(records: I) -> SourceTally
where
    I: IntoIterator<Item = &'a Itext>,
{
    records.into_iter().map(|itext| itext.source.as_str()).collect()
}
