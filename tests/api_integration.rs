//! REST API integration tests
//!
//! These drive the full router (`/api/v1/...`) against an in-memory SQLite
//! store and check status codes and JSON bodies.

mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::*;
use serde_json::json;

const GOOGLE: &str = "https://www.google.com/search?q=a+very+long+query";

#[tokio::test]
async fn test_create_with_explicit_code() {
    let (app, _) = create_test_app().await;

    let response = send(
        &app,
        post_json("/api/v1/urls", json!({ "long_url": GOOGLE, "short_url": "g" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({ "short_url": "g", "long_url": GOOGLE, "visit_count": 0 })
    );
}

#[tokio::test]
async fn test_create_stores_absolute_urls() {
    let (app, _) = create_test_app().await;

    let cases = [
        ("https://w3.org/", "https://w3.org/"),
        ("https://w3.org", "https://w3.org"),
        ("http://w3.org", "http://w3.org"),
        ("w3.org", "http://w3.org"),
        ("w3.org/", "http://w3.org/"),
    ];

    for (i, (input, stored)) in cases.iter().enumerate() {
        let short_url = format!("temp{i}");
        let response = send(
            &app,
            post_json(
                "/api/v1/urls",
                json!({ "long_url": input, "short_url": short_url }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED, "input {input}");

        let response = send(&app, get(&format!("/api/v1/urls/?short_url={short_url}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["long_url"], *stored);
        assert_eq!(body["short_url"], short_url);
        assert_eq!(body["visit_count"], 0);
    }
}

#[tokio::test]
async fn test_create_with_form_body() {
    let (app, _) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/urls")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("long_url=https%3A%2F%2Fw3.org%2F&short_url=form"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["short_url"], "form");
    assert_eq!(body["long_url"], "https://w3.org/");
}

#[tokio::test]
async fn test_create_with_multipart_body() {
    let (app, _) = create_test_app().await;

    let boundary = "snipboundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"long_url\"\r\n\r\n\
         w3.org\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"short_url\"\r\n\r\n\
         mp\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/urls")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["short_url"], "mp");
    assert_eq!(body["long_url"], "http://w3.org");
    assert_eq!(body["visit_count"], 0);
}

#[tokio::test]
async fn test_create_unsupported_content_type() {
    let (app, _) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/urls")
        .header("content-type", "text/plain")
        .body(Body::from("long_url=w3.org"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["code"], "1007");
    assert_eq!(body["errors"][0]["title"], "Unsupported media type");
}

#[tokio::test]
async fn test_create_generates_code() {
    let (app, _) = create_test_app().await;

    for payload in [json!({ "long_url": "w3.org" }), json!({ "long_url": "w3.org", "short_url": "" })] {
        let response = send(&app, post_json("/api/v1/urls", payload)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        let short_url = body["short_url"].as_str().unwrap();
        assert_eq!(short_url.len(), 6);
        assert!(short_url.bytes().all(|b| b.is_ascii_alphanumeric()));
    }
}

#[tokio::test]
async fn test_create_invalid_long_url() {
    let (app, storage) = create_test_app().await;
    let overlong = format!("http://www.{}.com", "0".repeat(3000));

    for long_url in ["yeah", "wtf", "htt://w3.org", overlong.as_str()] {
        let response = send(
            &app,
            post_json("/api/v1/urls", json!({ "long_url": long_url, "short_url": "y" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_title(response).await, "Invalid long_url");
    }

    assert!(storage.list(50, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_invalid_short_url() {
    let (app, _) = create_test_app().await;
    let too_long = "0".repeat(33);

    for short_url in [
        "\"; drop urlrecords --",
        "; drop urlrecords --",
        "#",
        "/*",
        "/* --",
        "--",
        "'''",
        "\"\"\"",
        "api",
        too_long.as_str(),
    ] {
        let response = send(
            &app,
            post_json(
                "/api/v1/urls",
                json!({ "long_url": "http://w3.org", "short_url": short_url }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let error = &body["errors"][0];
        assert_eq!(error["title"], "Invalid short_url");
        assert_eq!(error["code"], "1002");
        assert_eq!(error["status"], "400");
        // the offending input is never reflected
        assert!(!error["detail"].as_str().unwrap().contains("drop"));
    }
}

#[tokio::test]
async fn test_create_scheme_relative_is_malformed() {
    let (app, _) = create_test_app().await;

    let response = send(
        &app,
        post_json("/api/v1/urls", json!({ "long_url": "//evil.example.com/<script>" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["title"], "Malformed data");
    assert_eq!(body["errors"][0]["detail"], "Are you malicious?");
}

#[tokio::test]
async fn test_create_unparseable_body_is_malformed() {
    let (app, _) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/urls")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_title(response).await, "Malformed data");
}

#[tokio::test]
async fn test_create_duplicate_conflicts() {
    let (app, _) = create_test_app().await;
    let payload = json!({ "long_url": "w3.org", "short_url": "short" });

    let response = send(&app, post_json("/api/v1/urls", payload.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, post_json("/api/v1/urls", payload)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["title"], "short_url already exists");
    assert_eq!(body["errors"][0]["code"], "1003");
    assert_eq!(body["errors"][0]["status"], "409");
}

#[tokio::test]
async fn test_retrieve_record() {
    let (app, storage) = create_test_app().await;
    storage
        .create("VeryVeryShortUrl", "https://example.com/long")
        .await
        .unwrap();

    let response = send(&app, get("/api/v1/urls/?short_url=VeryVeryShortUrl")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "short_url": "VeryVeryShortUrl",
            "long_url": "https://example.com/long",
            "visit_count": 0
        })
    );

    let response = send(&app, get("/api/v1/urls/VeryVeryShortUrl")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // retrieval does not count as a visit
    let url = storage.get("VeryVeryShortUrl").await.unwrap().unwrap();
    assert_eq!(url.visit_count, 0);
}

#[tokio::test]
async fn test_retrieve_invalid_record() {
    let (app, _) = create_test_app().await;

    let response = send(&app, get("/api/v1/urls/?short_url=1mp0ssib1eR3c0rd")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_title(response).await, "short_url has no mapping");

    // short_url is required
    let response = send(&app, get("/api/v1/urls/?long_url=python.org")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        get("/api/v1/urls/?short_url=und3rsc0red_patt3rn%2FwithS1ash"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_title(response).await, "Invalid short_url");
}

#[tokio::test]
async fn test_list_records() {
    let (app, _) = create_test_app().await;

    let response = send(&app, get("/api/v1/urls")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    for i in 0..5 {
        let response = send(
            &app,
            post_json(
                "/api/v1/urls",
                json!({ "long_url": "w3.org", "short_url": i.to_string() }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, get("/api/v1/urls")).await;
    let body = body_json(response).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 5);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["short_url"], i.to_string());
        assert_eq!(record["long_url"], "http://w3.org");
        assert_eq!(record["visit_count"], 0);
    }

    let response = send(&app, get("/api/v1/urls?limit=2&offset=3")).await;
    let body = body_json(response).await;
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["short_url"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["3", "4"]);
}

#[tokio::test]
async fn test_list_is_capped() {
    let (app, storage) = create_test_app().await;
    for i in 0..55 {
        storage
            .create(&format!("c{i}"), "https://example.com")
            .await
            .unwrap();
    }

    let response = send(&app, get("/api/v1/urls?limit=500")).await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = create_test_app().await;

    let response = send(&app, get("/api/v1/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "OK" }));
}
