#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use snip::app;
use snip::config::{Config, DatabaseBackend, DatabaseConfig, RedirectMode, ServerConfig};
use snip::storage::{SqliteStorage, Storage};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create test storage
pub async fn create_test_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Helper to create test config
pub fn create_test_config(redirect_status: RedirectMode) -> Config {
    Config {
        database: DatabaseConfig {
            backend: DatabaseBackend::Sqlite,
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        redirect_status,
        trust_forwarded_for: false,
    }
}

pub async fn create_test_app() -> (Router, Arc<dyn Storage>) {
    let storage = create_test_storage().await;
    let config = create_test_config(RedirectMode::Found);
    (app::create_router(Arc::clone(&storage), &config), storage)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Title of the first error object in a JSON:API error body
pub async fn error_title(response: Response<Body>) -> String {
    let json = body_json(response).await;
    json["errors"][0]["title"].as_str().unwrap().to_string()
}
