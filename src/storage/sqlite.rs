use crate::models::UrlMapping;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        // Every connection to `:memory:` opens its own private database.
        let in_memory = database_url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { max_connections.max(1) };

        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urlrecords (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                short_code TEXT NOT NULL UNIQUE,
                long_url TEXT NOT NULL,
                visit_count INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create(&self, short_code: &str, long_url: &str) -> StorageResult<UrlMapping> {
        let created_at = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, UrlMapping>(
            r#"
            INSERT INTO urlrecords (short_code, long_url, visit_count, created_at)
            VALUES (?, ?, 0, ?)
            ON CONFLICT(short_code) DO NOTHING
            RETURNING id, short_code, long_url, visit_count, created_at
            "#,
        )
        .bind(short_code)
        .bind(long_url)
        .bind(created_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or(StorageError::Conflict)
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlMapping>> {
        let url = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, short_code, long_url, visit_count, created_at
            FROM urlrecords
            WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn exists(&self, short_code: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM urlrecords WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count > 0)
    }

    async fn increment_visit(&self, short_code: &str) -> StorageResult<UrlMapping> {
        let row = sqlx::query_as::<_, UrlMapping>(
            r#"
            UPDATE urlrecords
            SET visit_count = visit_count + 1
            WHERE short_code = ?
            RETURNING id, short_code, long_url, visit_count, created_at
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or(StorageError::NotFound)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UrlMapping>> {
        let urls = sqlx::query_as::<_, UrlMapping>(
            r#"
            SELECT id, short_code, long_url, visit_count, created_at
            FROM urlrecords
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(urls)
    }
}
