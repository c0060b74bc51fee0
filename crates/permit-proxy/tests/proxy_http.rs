//! HTTP-level tests for the `/api` relay and static serving.
//!
//! The router is driven in-process with `oneshot`; the upstream is a real
//! axum server on an ephemeral local port.

use std::net::SocketAddr;

use axum::{body::Body, http::header, routing::post, Router};
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use permit_proxy::{build_router, ProxyConfig, ProxyState};
use serde_json::{json, Value};
use tower::ServiceExt;

// ── Fake upstream ──────────────────────────────────────────────

async fn echo(body: String) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let answer = json!({"status": "success", "echo": request});
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        answer.to_string(),
    )
}

async fn html() -> (StatusCode, String) {
    (
        StatusCode::OK,
        format!("<!DOCTYPE html><html>{}</html>", "sign in ".repeat(40)),
    )
}

async fn unavailable() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "script quota exceeded")
}

async fn app_error() -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({"status": "error", "message": "Invalid credentials"}).to_string(),
    )
}

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/exec", post(echo))
        .route("/html", post(html))
        .route("/down", post(unavailable))
        .route("/app-error", post(app_error));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
async fn dead_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

// ── Helpers ────────────────────────────────────────────────────

fn proxy(upstream: Option<String>) -> Router {
    let mut config = ProxyConfig::default();
    config.upstream = upstream;
    build_router(ProxyState::new(config))
}

async fn post_api(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

const LOGIN: &str = r#"{"action":"checkLogin","payload":{"username":"amal","password":"pw"}}"#;

// ── Tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_forwards_body_verbatim_and_relays_json() {
    let addr = spawn_upstream().await;
    let (status, body) = post_api(proxy(Some(format!("http://{addr}/exec"))), LOGIN).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["echo"]["action"], "checkLogin");
    assert_eq!(body["echo"]["payload"]["username"], "amal");
}

#[tokio::test]
async fn test_application_errors_pass_through_untouched() {
    let addr = spawn_upstream().await;
    let (status, body) = post_api(proxy(Some(format!("http://{addr}/app-error"))), LOGIN).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Invalid credentials"})
    );
}

#[tokio::test]
async fn test_missing_upstream_is_500() {
    let (status, body) = post_api(proxy(None), LOGIN).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Proxy error: Upstream URL is not configured on the server."
    );
}

#[tokio::test]
async fn test_malformed_upstream_is_500() {
    let (status, body) = post_api(proxy(Some("script.google.com/exec".into())), LOGIN).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Proxy error: Upstream URL is not configured on the server."
    );
}

#[tokio::test]
async fn test_missing_action_is_400() {
    let addr = spawn_upstream().await;
    for bad in [r#"{"payload":{}}"#, r#"{"action":""}"#, "not json"] {
        let (status, body) = post_api(proxy(Some(format!("http://{addr}/exec"))), bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {bad}");
        assert_eq!(
            body["message"],
            "Proxy error: Request body or action is missing."
        );
    }
}

#[tokio::test]
async fn test_upstream_failure_status_is_relayed() {
    let addr = spawn_upstream().await;
    let (status, body) = post_api(proxy(Some(format!("http://{addr}/down"))), LOGIN).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "GS Error: Service Unavailable");
    assert_eq!(body["details"], "script quota exceeded");
}

#[tokio::test]
async fn test_non_json_upstream_is_500_with_excerpt() {
    let addr = spawn_upstream().await;
    let (status, body) = post_api(proxy(Some(format!("http://{addr}/html"))), LOGIN).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    let raw = format!("<!DOCTYPE html><html>{}</html>", "sign in ".repeat(40));
    let excerpt: String = raw.chars().take(100).collect();
    assert_eq!(message, format!("Proxy error: Invalid Response: {excerpt}..."));
}

#[tokio::test]
async fn test_unreachable_upstream_is_502() {
    let addr = dead_address().await;
    let (status, body) = post_api(proxy(Some(format!("http://{addr}/exec"))), LOGIN).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Proxy error: "));
}

#[tokio::test]
async fn test_root_serves_index_html() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Permit Desk</h1>").unwrap();
    let config = ProxyConfig::default().with_static_dir(dir.path());
    let app = build_router(ProxyState::new(config));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<h1>Permit Desk</h1>");
}
