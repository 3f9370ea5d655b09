//! Integration tests for the operational endpoints.

mod common;

use axum::http::StatusCode;
use common::{get_request, parse_response_body, TestApp};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["connected"], true);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/health/live")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "alive");

    let response = app.send(get_request("/api/health/ready")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_health_does_not_require_api_key() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/health")).await;
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/v2/commands")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
