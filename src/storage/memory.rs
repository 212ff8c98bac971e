use crate::models::UrlMapping;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Process-local store backed by a sharded concurrent map.
///
/// Nothing survives a restart; meant for tests and throwaway instances.
pub struct MemoryStorage {
    urls: DashMap<String, UrlMapping>,
    next_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            urls: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, short_code: &str, long_url: &str) -> StorageResult<UrlMapping> {
        // The entry guard holds the shard lock across check and insert.
        match self.urls.entry(short_code.to_string()) {
            Entry::Occupied(_) => Err(StorageError::Conflict),
            Entry::Vacant(slot) => {
                let mapping = UrlMapping {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed),
                    short_code: short_code.to_string(),
                    long_url: long_url.to_string(),
                    visit_count: 0,
                    created_at: chrono::Utc::now().timestamp(),
                };
                slot.insert(mapping.clone());
                Ok(mapping)
            }
        }
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlMapping>> {
        Ok(self.urls.get(short_code).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, short_code: &str) -> Result<bool> {
        Ok(self.urls.contains_key(short_code))
    }

    async fn increment_visit(&self, short_code: &str) -> StorageResult<UrlMapping> {
        let mut entry = self.urls.get_mut(short_code).ok_or(StorageError::NotFound)?;
        entry.visit_count += 1;
        Ok(entry.value().clone())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UrlMapping>> {
        let mut urls: Vec<UrlMapping> = self
            .urls
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        urls.sort_by_key(|url| url.id);

        Ok(urls
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}
