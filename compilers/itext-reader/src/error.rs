use itext_feed::FeedError;
use itext_index::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    /// Badges and the source list need the annotation feed first.
    #[error("Annotations have not been loaded yet")]
    FeedNotLoaded,

    #[error("No passage to load from `{0}`; expected `<text> <first> <last>`")]
    InvalidPassage(String),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A fetch performed by the host failed (network, HTTP status, ...).
    #[error("Request failed: {0}")]
    Fetch(String),
}
