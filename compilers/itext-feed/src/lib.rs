//! Decoders for the reader's inputs: the annotation sheet feed, Tesserae
//! XML texts and the passage string typed by the user.

pub mod error;
pub mod passage;
pub mod sheet;
pub mod tess;

pub use error::FeedError;
pub use passage::{decode_passage_response, parse_passage, passage_title};
pub use sheet::{decode_feed, FeedLocator};
pub use tess::parse_tess;
