//! Integration tests for the HTTP surface
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! crawled site is a wiremock server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use jobscript_harvester::config::{Config, CrawlerConfig};
use jobscript_harvester::server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app() -> Router {
    let config = Config {
        crawler: CrawlerConfig {
            page_budget: 20,
            concurrency: 3,
            fetch_timeout_ms: 2_000,
            fetch_retries: 0,
            retry_backoff_ms: 0,
        },
        ..Config::default()
    };

    build_router(AppState::from_config(config).expect("Failed to build app state"))
}

fn scrape_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/email-scraper")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_scrape_returns_emails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<a href="/contact">Contact</a>"#,
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("talent@example.com", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let body = json!({ "url": format!("  {}  ", mock_server.uri()) }).to_string();
    let (status, value) = send(test_app(), scrape_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({ "emails": ["talent@example.com"] }));
}

#[tokio::test]
async fn test_site_without_emails_returns_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>nothing</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let body = json!({ "url": mock_server.uri() }).to_string();
    let (status, value) = send(test_app(), scrape_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({ "emails": [] }));
}

#[tokio::test]
async fn test_missing_or_blank_url_is_bad_request() {
    for body in [
        json!({}).to_string(),
        json!({ "url": "" }).to_string(),
        json!({ "url": "   " }).to_string(),
        json!({ "url": 42 }).to_string(),
        "not json at all".to_string(),
    ] {
        let (status, value) = send(test_app(), scrape_request(body.clone())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(value, json!({ "error": "Please provide a valid URL" }));
    }
}

#[tokio::test]
async fn test_unparsable_url_is_bad_request() {
    let body = json!({ "url": "example dot com" }).to_string();
    let (status, value) = send(test_app(), scrape_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = value["error"].as_str().expect("error message");
    assert!(message.contains("Invalid start URL"), "got: {}", message);
}
