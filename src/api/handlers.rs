use axum::{
    extract::{
        rejection::QueryRejection, FromRequest, Multipart, Path, Query, Request, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Form, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use crate::client_ip::{client_ip_label, RemoteAddr};
use crate::error::ShortenerError;
use crate::models::{CreateUrlRequest, ListQuery, RetrieveQuery, UrlRecordResponse};
use crate::service::UrlService;

pub struct AppState {
    pub service: UrlService,
    pub trust_forwarded_for: bool,
}

impl AppState {
    fn client_ip(&self, headers: &HeaderMap, remote: RemoteAddr) -> String {
        client_ip_label(headers, remote, self.trust_forwarded_for)
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Create payload, accepted as JSON, an urlencoded form or a multipart form.
pub struct CreatePayload(pub CreateUrlRequest);

impl<S> FromRequest<S> for CreatePayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase());

        let payload = match content_type.as_deref() {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                Form::<CreateUrlRequest>::from_request(req, state)
                    .await
                    .map(|Form(payload)| payload)
                    .map_err(|_| ApiError::malformed())?
            }
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|_| ApiError::malformed())?;
                read_multipart(multipart).await?
            }
            Some(ct) if is_json(ct) => Json::<CreateUrlRequest>::from_request(req, state)
                .await
                .map(|Json(payload)| payload)
                .map_err(|_| ApiError::malformed())?,
            _ => return Err(ApiError::unsupported_media_type()),
        };

        Ok(CreatePayload(payload))
    }
}

/// `application/json` or any `+json` subtype.
fn is_json(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Collect the `long_url` and `short_url` text fields; other parts are skipped.
async fn read_multipart(mut multipart: Multipart) -> Result<CreateUrlRequest, ApiError> {
    let mut payload = CreateUrlRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::malformed())?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("long_url") => {
                payload.long_url = field.text().await.map_err(|_| ApiError::malformed())?;
            }
            Some("short_url") => {
                payload.short_url = Some(field.text().await.map_err(|_| ApiError::malformed())?);
            }
            _ => {}
        }
    }

    Ok(payload)
}

/// List mappings in insertion order
pub async fn list_urls(
    State(state): State<Arc<AppState>>,
    remote: RemoteAddr,
    headers: HeaderMap,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<UrlRecordResponse>>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::malformed())?;
    info!(
        client_ip = %state.client_ip(&headers, remote),
        limit = query.limit,
        offset = query.offset,
        "API list"
    );

    let urls = state.service.list(query.limit, query.offset).await?;
    Ok(Json(urls.into_iter().map(UrlRecordResponse::from).collect()))
}

/// Create a new mapping, generating a short_url when none is given
pub async fn create_url(
    State(state): State<Arc<AppState>>,
    remote: RemoteAddr,
    headers: HeaderMap,
    CreatePayload(payload): CreatePayload,
) -> Result<(StatusCode, Json<UrlRecordResponse>), ApiError> {
    let client_ip = state.client_ip(&headers, remote);
    info!(client_ip = %client_ip, "API create");

    let mapping = state
        .service
        .create(&payload.long_url, payload.short_url.as_deref())
        .await?;

    info!(
        client_ip = %client_ip,
        short_url = %mapping.short_code,
        long_url = %mapping.long_url,
        "Created mapping"
    );

    Ok((StatusCode::CREATED, Json(mapping.into())))
}

/// Retrieve a mapping by `?short_url=` without counting a visit
pub async fn retrieve_url(
    State(state): State<Arc<AppState>>,
    remote: RemoteAddr,
    headers: HeaderMap,
    query: Result<Query<RetrieveQuery>, QueryRejection>,
) -> Result<Json<UrlRecordResponse>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::malformed())?;
    let short_url = query.short_url.unwrap_or_default();

    retrieve(&state, &headers, remote, &short_url).await
}

/// Retrieve a mapping by path segment
pub async fn retrieve_url_by_path(
    State(state): State<Arc<AppState>>,
    remote: RemoteAddr,
    headers: HeaderMap,
    Path(short_url): Path<String>,
) -> Result<Json<UrlRecordResponse>, ApiError> {
    retrieve(&state, &headers, remote, &short_url).await
}

async fn retrieve(
    state: &AppState,
    headers: &HeaderMap,
    remote: RemoteAddr,
    short_url: &str,
) -> Result<Json<UrlRecordResponse>, ApiError> {
    let client_ip = state.client_ip(headers, remote);

    match state.service.retrieve(short_url).await {
        Ok(mapping) => {
            info!(client_ip = %client_ip, short_url = %mapping.short_code, "API retrieve");
            Ok(Json(mapping.into()))
        }
        Err(err @ ShortenerError::InvalidShortCode) => {
            info!(client_ip = %client_ip, "API retrieve with invalid short_url");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
