use serde::{Deserialize, Serialize};

use crate::view::{Badge, ItextView, RowView, SourceListView};

/// The two panels the reader switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    Annotations,
    SourceToolbox,
}

/// User actions reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
    LocusBadgeClicked { locus: String },
    SourceFilterChanged { sources: Vec<String> },
    SourceToggled { source: String, checked: bool },
    AllSourcesToggled { checked: bool },
    ShowAnnotations,
    ShowSources,
}

/// Instructions for the renderer. Each one replaces what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderUpdate {
    Title { text: String },
    Rows { rows: Vec<RowView> },
    SourceList { list: SourceListView },
    Badges { badges: Vec<Badge> },
    Annotations { itexts: Vec<ItextView> },
    View { mode: ViewMode },
    Error { message: String },
}
