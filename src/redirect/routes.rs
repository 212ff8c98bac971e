use axum::{routing::get, Router};
use std::sync::Arc;

use crate::config::RedirectMode;
use crate::service::UrlService;

use super::handlers::{redirect_url, RedirectState};

pub fn create_redirect_router(
    service: UrlService,
    redirect_status: RedirectMode,
    trust_forwarded_for: bool,
) -> Router {
    let state = Arc::new(RedirectState {
        service,
        redirect_status,
        trust_forwarded_for,
    });

    Router::new()
        .route("/{short_url}", get(redirect_url))
        .with_state(state)
}
