//! Create, lookup and redirect resolution on top of a [`Storage`].

use std::sync::Arc;
use tracing::debug;

use crate::error::{ShortenerError, ShortenerResult};
use crate::generator::{generate_unique_code, MAX_GENERATION_ATTEMPTS};
use crate::models::{ListQuery, UrlMapping};
use crate::storage::{Storage, StorageError};
use crate::validation::{validate_long_url, validate_short_code, LongUrl, ShortCode};

#[derive(Clone)]
pub struct UrlService {
    storage: Arc<dyn Storage>,
}

impl UrlService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Create a mapping. An absent or empty `short_code` gets a generated one.
    pub async fn create(
        &self,
        long_url: &str,
        short_code: Option<&str>,
    ) -> ShortenerResult<UrlMapping> {
        let long_url = validate_long_url(long_url)?;

        match short_code.filter(|code| !code.is_empty()) {
            Some(code) => {
                let code = validate_short_code(code)?;
                self.insert(&code, &long_url).await
            }
            None => self.insert_generated(&long_url).await,
        }
    }

    async fn insert(&self, code: &ShortCode, long_url: &LongUrl) -> ShortenerResult<UrlMapping> {
        self.storage
            .create(code.as_str(), long_url.as_str())
            .await
            .map_err(|e| ShortenerError::from_storage(e, code.as_str()))
    }

    /// A generated code can still lose an insert race after the existence
    /// check, so conflicts on insert draw again within the same budget.
    async fn insert_generated(&self, long_url: &LongUrl) -> ShortenerResult<UrlMapping> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_unique_code(self.storage.as_ref()).await?;
            match self.storage.create(code.as_str(), long_url.as_str()).await {
                Ok(mapping) => return Ok(mapping),
                Err(StorageError::Conflict) => {
                    debug!(short_code = %code, "generated short_url taken concurrently");
                }
                Err(e) => return Err(ShortenerError::from_storage(e, code.as_str())),
            }
        }

        Err(ShortenerError::CodeSpaceExhausted(MAX_GENERATION_ATTEMPTS))
    }

    /// Count a visit and return the updated mapping to redirect to.
    pub async fn resolve(&self, short_code: &str) -> ShortenerResult<UrlMapping> {
        let code = validate_short_code(short_code)?;

        self.storage
            .increment_visit(code.as_str())
            .await
            .map_err(|e| ShortenerError::from_storage(e, code.as_str()))
    }

    /// Look a mapping up without counting a visit.
    pub async fn retrieve(&self, short_code: &str) -> ShortenerResult<UrlMapping> {
        let code = validate_short_code(short_code)?;

        self.storage
            .get(code.as_str())
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.into_inner()))
    }

    /// Mappings in insertion order, at most [`ListQuery::MAX_LIMIT`] per page.
    pub async fn list(&self, limit: i64, offset: i64) -> ShortenerResult<Vec<UrlMapping>> {
        let limit = limit.clamp(1, ListQuery::MAX_LIMIT);
        let offset = offset.max(0);

        Ok(self.storage.list(limit, offset).await?)
    }
}
