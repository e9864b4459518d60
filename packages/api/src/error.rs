//! Error kinds returned by every core operation.
//!
//! Storage failures collapse into [`Error::Internal`]; the underlying message is
//! logged where the conversion happens and never carried to the caller.

use store::StoreError;
use thiserror::Error;

use crate::auth::TokenError;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input, detected before touching storage.
    #[error("{0}")]
    Validation(String),
    #[error("authentication required: {0}")]
    Unauthenticated(#[from] TokenError),
    #[error("operation not permitted")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("tag not found")]
    TagNotFound,
    #[error("a note cannot be shared with its owner")]
    SelfShare,
    #[error("{0} already exists")]
    Conflict(&'static str),
    /// Unknown user and wrong password are reported identically.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error")]
    Internal,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => Error::Conflict(what),
            // A referenced row vanished between the check and the write.
            StoreError::MissingReference(what) => Error::NotFound(what),
            StoreError::Backend(message) => {
                tracing::error!(%message, "storage failure");
                Error::Internal
            }
        }
    }
}
