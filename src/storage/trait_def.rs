use crate::models::UrlMapping;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    Conflict,
    #[error("short code not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Other(err.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable mapping store keyed by short code.
///
/// Implementations must make `create` and `increment_visit` atomic with
/// respect to concurrent callers using the backend's own primitives.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Insert a new mapping, failing with `Conflict` if the code is taken
    async fn create(&self, short_code: &str, long_url: &str) -> StorageResult<UrlMapping>;

    /// Get a mapping by short code
    async fn get(&self, short_code: &str) -> Result<Option<UrlMapping>>;

    /// Whether a mapping exists for the short code
    async fn exists(&self, short_code: &str) -> Result<bool>;

    /// Increment the visit count and return the updated mapping
    async fn increment_visit(&self, short_code: &str) -> StorageResult<UrlMapping>;

    /// List mappings in insertion order
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UrlMapping>>;
}
