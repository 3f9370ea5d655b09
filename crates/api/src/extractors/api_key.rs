//! API key authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::crypto::{is_well_formed_key, sha256_hex};

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the raw API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authenticated API key information.
///
/// Validated against the identity directory; placed in request extensions
/// by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyAuth {
    /// Directory ID of the authenticated API key.
    pub api_key_id: i64,
    /// Key prefix for identification in logs (never the full key).
    pub key_prefix: String,
    /// Whether this key may acknowledge and remove commands.
    pub is_admin: bool,
}

impl ApiKeyAuth {
    /// Validates a raw API key and returns authentication info.
    pub async fn validate(state: &AppState, api_key: &str) -> Result<Self, ApiError> {
        if !is_well_formed_key(api_key) {
            return Err(invalid_key());
        }

        let key = state
            .identity
            .find_api_key(&sha256_hex(api_key))
            .await
            .map_err(|e| {
                tracing::error!("Identity directory error during API key lookup: {}", e);
                ApiError::ServiceUnavailable("Authentication service unavailable".to_string())
            })?
            .ok_or_else(invalid_key)?;

        if !key.is_active {
            return Err(invalid_key());
        }
        if !key.is_valid_at(state.clock.now()) {
            return Err(ApiError::Unauthorized("API key has expired".to_string()));
        }

        // Update last_used_at asynchronously (fire and forget)
        let identity = state.identity.clone();
        let key_id = key.id;
        tokio::spawn(async move {
            if let Err(e) = identity.record_key_use(key_id).await {
                tracing::warn!("Failed to update API key last_used_at: {}", e);
            }
        });

        Ok(ApiKeyAuth {
            api_key_id: key.id,
            key_prefix: key.key_prefix,
            is_admin: key.is_admin,
        })
    }
}

fn invalid_key() -> ApiError {
    ApiError::Unauthorized("Invalid or missing API key".to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already validated by the auth middleware.
        if let Some(auth) = parts.extensions.get::<ApiKeyAuth>() {
            return Ok(auth.clone());
        }

        let api_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(invalid_key)?;

        Self::validate(state, api_key).await
    }
}
