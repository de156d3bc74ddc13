use thiserror::Error;

/// Failure of a single call against the contacts backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("could not reach contacts server: {0}")]
    Network(String),
    #[error("contacts server did not answer in time")]
    Timeout,
    #[error("contact not found: {0}")]
    NotFound(String),
    #[error("contact rejected by server: {0}")]
    Validation(String),
    #[error("contacts server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response from contacts server: {0}")]
    Decode(String),
    #[error("invalid contacts server url '{0}'")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
