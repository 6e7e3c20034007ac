use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Note content cannot be empty")]
    Empty,

    #[error("Note exceeds {max} characters ({actual} given)")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Server(String),

    #[error("response did not contain a payload")]
    MissingPayload,

    #[error("unexpected response from server (HTTP {status})")]
    UnexpectedResponse { status: u16 },
}

impl ApiError {
    /// True when nothing was sent because the input failed local checks.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}
