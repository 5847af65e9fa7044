use itext_feed::{parse_passage, passage_title};
use itext_index::{filter_by_source, Session, SourceSet, SourceTally};
use itext_locus::{standardize, QUERY_SEPARATOR};
use itext_protocol::{Itext, PassageQuery, TextUnit};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{PageConfig, RowOptions};
use crate::error::PageError;
use crate::events::{RenderUpdate, UiEvent, ViewMode};
use crate::source::{AnnotationSource, TextSource};
use crate::view::{render_rows, Badge, ItextView, SourceListView, SourceRow};

/// Issued when a fetch starts, handed back with its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Rebuilds a ticket that crossed a host boundary as a number.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// State of one reader page: the annotation session, the displayed passage,
/// the source filter and the visible panel.
///
/// All mutation happens through loads and [`UiEvent`]s on a single thread.
#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    session: Option<Session>,
    tally: SourceTally,
    selected: SourceSet,
    rows: Vec<TextUnit>,
    view: Option<ViewMode>,
    last_error: Option<String>,
    issued: u64,
    latest_feed: Option<LoadTicket>,
    latest_passage: Option<LoadTicket>,
}

impl Page {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            session: None,
            tally: SourceTally::new(),
            selected: SourceSet::new(),
            rows: Vec::new(),
            view: None,
            last_error: None,
            issued: 0,
            latest_feed: None,
            latest_passage: None,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn view(&self) -> Option<ViewMode> {
        self.view
    }

    pub fn selected_sources(&self) -> &SourceSet {
        &self.selected
    }

    pub fn rows(&self) -> &[TextUnit] {
        &self.rows
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The target passage named in the config, if it has all three fields.
    pub fn passage_query(&self) -> Option<PassageQuery> {
        parse_passage(&self.config.passage)
    }

    fn issue(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    pub fn begin_feed_load(&mut self) -> LoadTicket {
        let ticket = self.issue();
        self.latest_feed = Some(ticket);
        ticket
    }

    pub fn begin_passage_load(&mut self) -> LoadTicket {
        let ticket = self.issue();
        self.latest_passage = Some(ticket);
        ticket
    }

    /// A newer load has been started since `ticket` was issued.
    pub fn is_stale(&self, ticket: LoadTicket) -> bool {
        self.latest_feed != Some(ticket) && self.latest_passage != Some(ticket)
    }

    /// Installs a freshly fetched annotation collection and checks every source.
    pub fn load_feed(&mut self, ticket: LoadTicket, itexts: Vec<Itext>) -> Vec<RenderUpdate> {
        if self.is_stale(ticket) {
            // Applied anyway: the last response to arrive wins.
            warn!(?ticket, "applying stale annotation feed response");
        }

        let session = Session::new(itexts);
        self.tally = session.tally();
        self.selected = session.sources();
        info!(
            annotations = session.len(),
            sources = self.tally.len(),
            "annotation feed loaded"
        );
        self.session = Some(session);
        self.last_error = None;

        if self.rows.is_empty() {
            return vec![RenderUpdate::SourceList {
                list: self.source_list(),
            }];
        }
        self.refresh_badges()
    }

    /// Displays a fetched passage and its badges. The feed must already be loaded.
    pub fn load_passage(
        &mut self,
        ticket: LoadTicket,
        units: Vec<TextUnit>,
    ) -> Result<Vec<RenderUpdate>, PageError> {
        if self.session.is_none() {
            return Err(PageError::FeedNotLoaded);
        }
        if self.is_stale(ticket) {
            warn!(?ticket, "applying stale passage response");
        }

        debug!(units = units.len(), "passage loaded");
        self.rows = units;

        let mut updates = Vec::new();
        if let Some(query) = self.passage_query() {
            updates.push(RenderUpdate::Title {
                text: passage_title(&query),
            });
        }
        updates.push(RenderUpdate::Rows {
            rows: render_rows(&self.rows, RowOptions::target(), self.config.separator),
        });
        updates.push(RenderUpdate::Badges {
            badges: self.badges(),
        });
        Ok(updates)
    }

    /// Records a failed load so the page shows an error instead of going inert.
    pub fn fail(&mut self, err: &PageError) -> RenderUpdate {
        warn!(error = %err, "page load failed");
        let message = err.to_string();
        self.last_error = Some(message.clone());
        RenderUpdate::Error { message }
    }

    /// Loads the feed, then the source list, then the passage and its badges.
    ///
    /// A failing step ends the sequence with a [`RenderUpdate::Error`] after
    /// the updates of the steps that succeeded, and is kept as
    /// [`Page::last_error`].
    pub fn init_page<T, A>(&mut self, texts: &T, feed: &A) -> Vec<RenderUpdate>
    where
        T: TextSource,
        A: AnnotationSource,
    {
        let mut updates = Vec::new();
        if let Err(err) = self.run_init(texts, feed, &mut updates) {
            updates.push(self.fail(&err));
        }
        updates
    }

    fn run_init<T, A>(
        &mut self,
        texts: &T,
        feed: &A,
        updates: &mut Vec<RenderUpdate>,
    ) -> Result<(), PageError>
    where
        T: TextSource,
        A: AnnotationSource,
    {
        let ticket = self.begin_feed_load();
        let itexts = feed.annotations(&self.config.feed)?;
        updates.extend(self.load_feed(ticket, itexts));

        let Some(query) = self.passage_query() else {
            warn!(passage = %self.config.passage, "no passage to display");
            return Ok(());
        };

        let ticket = self.begin_passage_load();
        let units = texts.passage(&query)?;
        updates.extend(self.load_passage(ticket, units)?);
        Ok(())
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<Vec<RenderUpdate>, PageError> {
        let session = self.session.as_ref().ok_or(PageError::FeedNotLoaded)?;
        debug!(?event, "ui event");

        match event {
            UiEvent::LocusBadgeClicked { locus } => {
                let itexts = self.annotations_at(session, &locus);
                self.view = Some(ViewMode::Annotations);
                Ok(vec![
                    RenderUpdate::Annotations { itexts },
                    RenderUpdate::View {
                        mode: ViewMode::Annotations,
                    },
                ])
            }
            UiEvent::SourceFilterChanged { sources } => {
                self.selected = sources.into_iter().collect();
                Ok(self.refresh_badges())
            }
            UiEvent::SourceToggled { source, checked } => {
                if checked {
                    self.selected.insert(source);
                } else {
                    self.selected.remove(&source);
                }
                Ok(self.refresh_badges())
            }
            UiEvent::AllSourcesToggled { checked } => {
                self.selected = if checked {
                    session.sources()
                } else {
                    SourceSet::new()
                };
                Ok(self.refresh_badges())
            }
            UiEvent::ShowAnnotations => Ok(self.show(ViewMode::Annotations)),
            UiEvent::ShowSources => Ok(self.show(ViewMode::SourceToolbox)),
        }
    }

    fn show(&mut self, mode: ViewMode) -> Vec<RenderUpdate> {
        self.view = Some(mode);
        vec![RenderUpdate::View { mode }]
    }

    /// Clears the annotation panel and recomputes every badge.
    fn refresh_badges(&self) -> Vec<RenderUpdate> {
        vec![
            RenderUpdate::Annotations { itexts: Vec::new() },
            RenderUpdate::SourceList {
                list: self.source_list(),
            },
            RenderUpdate::Badges {
                badges: self.badges(),
            },
        ]
    }

    /// Turns a locus shown with the configured separator back into one the
    /// index can split.
    fn query_locus(&self, shown: &str) -> String {
        let dotted: String = shown
            .chars()
            .map(|c| if c == self.config.separator { QUERY_SEPARATOR } else { c })
            .collect();
        standardize(&dotted, QUERY_SEPARATOR)
    }

    fn annotations_at(&self, session: &Session, locus: &str) -> Vec<ItextView> {
        let locus = self.query_locus(locus);
        filter_by_source(session.by_locus(&locus), &self.selected)
            .into_iter()
            .map(|itext| ItextView::new(itext, self.config.separator))
            .collect()
    }

    /// Badge for every displayed line with at least one selected annotation.
    /// No source selected means no badges at all.
    pub fn badges(&self) -> Vec<Badge> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        if self.selected.is_empty() {
            return Vec::new();
        }

        self.rows
            .iter()
            .filter_map(|unit| {
                let query = standardize(&unit.loc, QUERY_SEPARATOR);
                let count = filter_by_source(session.by_locus(&query), &self.selected).len();
                (count > 0).then(|| Badge {
                    row_id: unit.id.into(),
                    locus: standardize(&unit.loc, self.config.separator),
                    count,
                })
            })
            .collect()
    }

    pub fn source_list(&self) -> SourceListView {
        let rows: Vec<SourceRow> = self
            .tally
            .sorted()
            .into_iter()
            .map(|(source, count)| SourceRow {
                source: source.to_string(),
                count,
                checked: self.selected.contains(source),
            })
            .collect();

        SourceListView {
            total: self.tally.total(),
            all_checked: rows.iter().all(|r| r.checked),
            rows,
        }
    }
}
