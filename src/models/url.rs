use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the mapping store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UrlMapping {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub visit_count: i64,
    pub created_at: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub long_url: String,
    /// Empty or missing means "generate one".
    #[serde(default)]
    pub short_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RetrieveQuery {
    #[serde(default)]
    pub short_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "ListQuery::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl ListQuery {
    pub const MAX_LIMIT: i64 = 50;

    const fn default_limit() -> i64 {
        Self::MAX_LIMIT
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: Self::default_limit(),
            offset: 0,
        }
    }
}

/// Public shape of a mapping in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecordResponse {
    pub short_url: String,
    pub long_url: String,
    pub visit_count: i64,
}

impl From<UrlMapping> for UrlRecordResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            short_url: mapping.short_code,
            long_url: mapping.long_url,
            visit_count: mapping.visit_count,
        }
    }
}
