use crate::models::UrlMapping;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urlrecords (
                id BIGSERIAL PRIMARY KEY,
                short_code VARCHAR(32) NOT NULL UNIQUE,
                long_url VARCHAR(2048) NOT NULL,
                visit_count BIGINT NOT NULL DEFAULT 0,
                created_at BIGINT NOT NULL
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
            VALUES ($1, $2, 0, $3)
            ON CONFLICT (short_code) DO NOTHING
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
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn exists(&self, short_code: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM urlrecords WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count.0 > 0)
    }

    async fn increment_visit(&self, short_code: &str) -> StorageResult<UrlMapping> {
        let row = sqlx::query_as::<_, UrlMapping>(
            r#"
            UPDATE urlrecords
            SET visit_count = visit_count + 1
            WHERE short_code = $1
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
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(urls)
    }
}
