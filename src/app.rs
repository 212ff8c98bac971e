use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::redirect;
use crate::service::UrlService;
use crate::storage::Storage;

/// The full service: REST API under `/api/v1` plus `GET /{short_url}` redirects.
pub fn create_router(storage: Arc<dyn Storage>, config: &Config) -> Router {
    let service = UrlService::new(storage);

    let api_router = api::create_api_router(service.clone(), config.trust_forwarded_for);
    let redirect_router = redirect::create_redirect_router(
        service,
        config.redirect_status,
        config.trust_forwarded_for,
    );

    Router::new()
        .nest("/api/v1", api_router)
        .merge(redirect_router)
        .layer(TraceLayer::new_for_http())
}
