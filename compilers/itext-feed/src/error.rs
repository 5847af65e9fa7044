use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Malformed annotation feed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed Tesserae document near byte {offset}: {message}")]
    Xml { offset: usize, message: String },

    #[error("<{element}> is missing attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid text unit id `{0}`")]
    InvalidId(String),
}
