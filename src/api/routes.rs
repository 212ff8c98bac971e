use axum::{routing::get, Router};
use std::sync::Arc;

use crate::service::UrlService;

use super::handlers::{
    create_url, health_check, list_urls, retrieve_url, retrieve_url_by_path, AppState,
};

/// REST routes, to be nested under `/api/v1`.
pub fn create_api_router(service: UrlService, trust_forwarded_for: bool) -> Router {
    let state = Arc::new(AppState {
        service,
        trust_forwarded_for,
    });

    Router::new()
        .route("/health", get(health_check))
        .route("/urls", get(list_urls).post(create_url))
        .route("/urls/", get(retrieve_url))
        .route("/urls/{short_url}", get(retrieve_url_by_path))
        .with_state(state)
}
