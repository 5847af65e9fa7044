use itext_index::{query_path, source_range, target_range};
use itext_locus::standardize;
use itext_protocol::{Itext, PassageQuery, TextUnit};
use serde::Serialize;

use crate::config::RowOptions;

/// One displayed line of a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: u32,
    pub dom_id: Option<String>,
    /// Locus with the display separator.
    pub loc: String,
    pub verse: String,
    pub meta_cell: bool,
}

pub fn render_rows<'a, I>(units: I, options: RowOptions, sep: char) -> Vec<RowView>
where
    I: IntoIterator<Item = &'a TextUnit>,
{
    units
        .into_iter()
        .map(|unit| RowView {
            id: unit.id.into(),
            dom_id: options.label_id.then(|| format!("verse_id_{}", unit.id.0)),
            loc: standardize(&unit.loc, sep),
            verse: unit.verse.clone(),
            meta_cell: options.meta_cell,
        })
        .collect()
}

/// Annotation count shown next to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub row_id: u32,
    pub locus: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRow {
    pub source: String,
    pub count: usize,
    pub checked: bool,
}

/// The source checklist: an "all" row carrying the total, then one row per source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceListView {
    pub total: usize,
    pub all_checked: bool,
    pub rows: Vec<SourceRow>,
}

/// Display model of a single intertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItextView {
    /// `1,5` or `1,5 - 1,8`
    pub target_loci: String,
    pub target_text: String,
    pub source: String,
    pub source_loci: String,
    pub note: String,
    pub commentary: String,
    pub contributor: String,
    /// Loaded on demand when the reader expands the source passage.
    pub source_query: PassageQuery,
    pub source_path: String,
}

impl ItextView {
    pub fn new(itext: &Itext, sep: char) -> Self {
        let source_query = PassageQuery {
            name: itext.source.clone(),
            first: itext.source_start.clone(),
            last: itext.source_stop.clone(),
        };
        let source_path = query_path(&source_query);

        Self {
            target_loci: target_range(itext).display(sep),
            target_text: itext.target_text.clone(),
            source: itext.source.clone(),
            source_loci: source_range(itext).display(sep),
            note: itext.note.clone(),
            commentary: itext.auth.clone(),
            contributor: itext.added_by.clone(),
            source_query,
            source_path,
        }
    }

    /// Header line: target loci followed by the quoted words.
    pub fn heading(&self) -> String {
        format!("{} {}", self.target_loci, self.target_text)
    }

    /// Link text for the source passage.
    pub fn source_label(&self) -> String {
        format!("{} {}", self.source, self.source_loci)
    }
}
