// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sharecane_server::{config::Config, routes, state::AppState};

/// Build the full application router with default configuration.
pub fn create_test_app() -> Router {
    let state = AppState::new(&Config::default()).expect("Failed to build test state");
    routes::router(state)
}

/// A small article page exercising every extraction path.
pub const ARTICLE_HTML: &str = r#"<!doctype html>
<html><head>
  <title>Hello</title>
  <meta name="description" content="A page about things">
  <meta name="keywords" content="">
  <meta property="og:title" content="OG Hello">
  <meta property="og:site_name" content="Acme">
  <meta property="twitter:card" content="summary_large_image">
  <meta name="twitter:card" content="summary">
  <meta name="twitter:creator" content="@me">
  <meta property="article:published_time" content="2024-05-01T10:00:00Z">
</head><body></body></html>"#;

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Scenario helpers ─────────────────────────────────────────────────────────

/// Extract a record from HTML through `POST /page-info` and return it.
pub async fn extract_record(html: &str, url: &str) -> Value {
    let (status, body) = post_json(
        create_test_app(),
        "/page-info",
        serde_json::json!({ "url": url, "html": html }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "setup extract failed: {body}");
    body["record"].clone()
}

/// Render `template` against `record` through `POST /render`.
pub async fn render(template: &str, record: Value) -> (StatusCode, Value) {
    post_json(
        create_test_app(),
        "/render",
        serde_json::json!({ "template": template, "record": record }),
    )
    .await
}
