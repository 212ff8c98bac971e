use thiserror::Error;

use crate::storage::StorageError;

/// Errors produced by validation, code generation and the mapping store.
///
/// Variants carrying a code only ever carry one that already passed
/// validation, so they are safe to echo back to clients.
#[derive(Debug, Error)]
pub enum ShortenerError {
    #[error("long_url is not a valid absolute http(s) URL")]
    InvalidLongUrl,

    #[error("malformed input")]
    MalformedInput,

    #[error("short_url does not match ^[A-Za-z0-9]{{1,32}}$")]
    InvalidShortCode,

    #[error("short_url `{0}` already exists")]
    DuplicateShortCode(String),

    #[error("short_url `{0}` has no mapping")]
    NotFound(String),

    #[error("unable to generate an unused short_url after {0} attempts")]
    CodeSpaceExhausted(usize),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ShortenerResult<T> = Result<T, ShortenerError>;

impl ShortenerError {
    /// Lift a store error, attaching the code the operation was keyed on.
    pub fn from_storage(err: StorageError, short_code: &str) -> Self {
        match err {
            StorageError::Conflict => Self::DuplicateShortCode(short_code.to_string()),
            StorageError::NotFound => Self::NotFound(short_code.to_string()),
            StorageError::Other(e) => Self::Storage(e),
        }
    }
}
