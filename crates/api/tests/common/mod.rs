//! Common test utilities for integration tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`
//! against the in-memory command store and identity directory, so these
//! tests need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use dispatch_api::{
    app::{create_app, AppState},
    config::Config,
};
use domain::services::InMemoryIdentityDirectory;
use domain::store::InMemoryCommandStore;
use serde_json::Value;
use shared::clock::ManualClock;
use tower::ServiceExt;
use uuid::Uuid;

/// Key with operator (non-admin) rights.
pub const OPERATOR_KEY: &str = "dk_operator_test_key";

/// Key with admin rights.
pub const ADMIN_KEY: &str = "dk_adminkey_test_key";

/// Fixed start time for the manual clock.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 15, 5, 0, 0).unwrap()
}

/// Test configuration; no file system or environment access.
pub fn test_config() -> Config {
    Config::load_for_test(&[
        ("database.url", "postgres://unused@localhost/unused"),
        ("logging.format", "pretty"),
    ])
    .expect("Failed to build test config")
}

/// Application under test plus handles on its collaborators.
pub struct TestApp {
    pub router: Router,
    pub directory: Arc<InMemoryIdentityDirectory>,
    pub store: Arc<InMemoryCommandStore>,
    pub clock: ManualClock,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let clock = ManualClock::new(start_time());
        let store = Arc::new(InMemoryCommandStore::new(Arc::new(clock.clone())));
        let directory = Arc::new(InMemoryIdentityDirectory::new());
        directory.register_api_key(OPERATOR_KEY, false);
        directory.register_api_key(ADMIN_KEY, true);

        let state = AppState::new(
            config,
            store.clone(),
            directory.clone(),
            Arc::new(clock.clone()),
        );

        Self {
            router: create_app(state),
            directory,
            store,
            clock,
        }
    }

    /// Registers a fresh controller.
    pub fn controller(&self) -> Uuid {
        self.directory.add_controller()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Enqueues a command through the API and returns its JSON.
    pub async fn enqueue(&self, controller_id: Uuid, action: &str, parameter: &str) -> Value {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/v1/commands",
                serde_json::json!({
                    "controller_id": controller_id,
                    "action": action,
                    "parameter": parameter
                }),
                OPERATOR_KEY,
            ))
            .await;
        assert_eq!(response.status(), 201, "enqueue failed");
        parse_response_body(response).await
    }

    /// Acknowledges a command through the API.
    pub async fn acknowledge(&self, id: &str, body: Value) -> Response<Body> {
        self.send(json_request(
            Method::PATCH,
            &format!("/api/v1/commands/{}", id),
            body,
            ADMIN_KEY,
        ))
        .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a JSON request carrying an API key.
pub fn json_request(method: Method, uri: &str, body: Value, api_key: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-API-Key", api_key)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a bodiless request carrying an API key.
pub fn request_with_api_key(method: Method, uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", api_key)
        .body(Body::empty())
        .unwrap()
}

/// Builds a GET request without credentials.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Reads a response body as JSON.
pub async fn parse_response_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse response body: {:?}",
            String::from_utf8_lossy(&body)
        )
    })
}
