//! The reader page as data: loads go in, UI events go in, render updates
//! come out. Drawing them is left to the host.

pub mod config;
pub mod error;
pub mod events;
pub mod page;
pub mod source;
pub mod view;

pub use config::{PageConfig, RowOptions};
pub use error::PageError;
pub use events::{RenderUpdate, UiEvent, ViewMode};
pub use page::{LoadTicket, Page};
pub use source::{AnnotationSource, StaticFeed, TextSource};
pub use view::{render_rows, Badge, ItextView, RowView, SourceListView, SourceRow};
