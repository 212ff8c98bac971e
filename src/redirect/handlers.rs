use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::client_ip::{client_ip_label, RemoteAddr};
use crate::config::RedirectMode;
use crate::error::ShortenerError;
use crate::service::UrlService;

pub struct RedirectState {
    pub service: UrlService,
    pub redirect_status: RedirectMode,
    pub trust_forwarded_for: bool,
}

/// Redirect to the long URL, counting the visit
pub async fn redirect_url(
    State(state): State<Arc<RedirectState>>,
    remote: RemoteAddr,
    headers: HeaderMap,
    Path(short_url): Path<String>,
) -> Response {
    let client_ip = client_ip_label(&headers, remote, state.trust_forwarded_for);

    match state.service.resolve(&short_url).await {
        Ok(mapping) => match HeaderValue::from_str(&mapping.long_url) {
            Ok(location) => {
                info!(
                    client_ip = %client_ip,
                    short_url = %mapping.short_code,
                    long_url = %mapping.long_url,
                    visit_count = mapping.visit_count,
                    "Redirect"
                );
                (
                    state.redirect_status.status_code(),
                    [(header::LOCATION, location)],
                )
                    .into_response()
            }
            Err(_) => {
                error!(short_url = %mapping.short_code, "stored long_url is not a valid Location header");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        },
        Err(ShortenerError::NotFound(_)) | Err(ShortenerError::InvalidShortCode) => {
            info!(client_ip = %client_ip, short_url = ?short_url, "Redirect failed");
            (StatusCode::NOT_FOUND, "URL not found").into_response()
        }
        Err(e) => {
            error!(short_url = ?short_url, error = %e, "Redirect lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
