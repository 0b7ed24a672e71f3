use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream answered with a non-2xx status; `detail` is its body text.
    #[error("Request failed ({status}): {detail}")]
    Upstream { status: u16, detail: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed payload: {0}")]
    Decode(String),

    #[error("View unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(#[from] eyre::Report),
}

impl BoardError {
    /// True for failures that came from fetching or decoding upstream data.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            BoardError::Upstream { .. } | BoardError::Transport(_) | BoardError::Decode(_)
        )
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Decode(err.to_string())
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
