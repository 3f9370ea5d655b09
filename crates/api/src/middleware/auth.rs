//! Authentication middleware.
//!
//! Every command route needs a valid API key; acknowledging and removing
//! commands additionally needs an admin key.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiKeyAuth, API_KEY_HEADER};
use crate::middleware::trace_id::get_request_id;

/// Middleware that requires API key authentication.
///
/// The authenticated key is stored in request extensions for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let api_key = api_key_header(&req);
    match authenticate(&state, api_key).await {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

/// Middleware for admin-only routes.
///
/// Requires API key authentication AND admin privileges on the key.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let api_key = api_key_header(&req);
    match authenticate(&state, api_key).await {
        Ok(auth) if auth.is_admin => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Ok(auth) => {
            tracing::warn!(
                request_id = %get_request_id(req.extensions()),
                key_prefix = %auth.key_prefix,
                "Admin route refused for non-admin key"
            );
            ApiError::Forbidden("Admin access required".to_string()).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Owned copy of the `X-API-Key` header, so no borrow of the request is
/// held across the directory lookup.
fn api_key_header(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn authenticate(state: &AppState, api_key: Option<String>) -> Result<ApiKeyAuth, ApiError> {
    let api_key = api_key
        .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API key".to_string()))?;

    ApiKeyAuth::validate(state, &api_key).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_api_key_header_is_copied() {
        let req = Request::builder()
            .header(API_KEY_HEADER, "dk_fieldops01")
            .body(Body::empty())
            .unwrap();
        assert_eq!(api_key_header(&req).as_deref(), Some("dk_fieldops01"));

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(api_key_header(&req), None);
    }

    #[test]
    fn test_auth_middleware_layers_onto_router() {
        let config = crate::config::Config::load_for_test(&[]).unwrap();
        let clock: std::sync::Arc<dyn shared::clock::Clock> =
            std::sync::Arc::new(shared::clock::SystemClock);
        let state = AppState::new(
            config,
            std::sync::Arc::new(domain::store::InMemoryCommandStore::new(clock.clone())),
            std::sync::Arc::new(domain::services::InMemoryIdentityDirectory::new()),
            clock,
        );

        let router: Router = Router::new()
            .route("/auth", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_auth,
            ))
            .route("/admin", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_admin,
            ))
            .with_state(state.clone());
        assert_send(&router);

        let future = authenticate(&state, Some("dk_fieldops01".to_string()));
        assert_send(&future);
    }
}
