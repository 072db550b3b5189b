//! Error taxonomy shared by the fetcher, the store and the HTTP surface

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The inbound request had no recognizable HTTP method.
    #[error("Bad Request")]
    BadRequest,

    /// The upstream page could not be fetched or answered with a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code used when this error ends a request.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Transport(_)
            | Self::StorageWrite(_)
            | Self::StorageRead(_)
            | Self::Internal(_) => 500,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
