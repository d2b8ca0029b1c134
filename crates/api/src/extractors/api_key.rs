//! API key authentication.

use axum::http::HeaderMap;
use chrono::Utc;
use sqlx::PgPool;

use crate::error::ApiError;
use persistence::entities::KeyStatus;
use persistence::repositories::ApiKeyRepository;
use shared::crypto::PresentedKey;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Raw API key from the request headers, if any.
pub fn api_key_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Authenticated API key information.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    /// Database ID of the authenticated API key.
    pub api_key_id: i64,
    /// Key prefix for identification in logs (e.g., "aBcDeFgH").
    pub key_prefix: String,
    /// Whether this key may manage customer spend limits.
    pub is_admin: bool,
}

impl ApiKeyAuth {
    /// Validates an API key and returns authentication info.
    pub async fn validate(pool: &PgPool, api_key: &str) -> Result<Self, ApiError> {
        let presented = PresentedKey::parse(api_key)
            .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API key".to_string()))?;

        let repo = ApiKeyRepository::new(pool.clone());
        let key = repo
            .find_by_hash(&presented.digest())
            .await
            .map_err(|e| {
                tracing::error!("Database error during API key lookup: {}", e);
                ApiError::ServiceUnavailable("Authentication service unavailable".to_string())
            })?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API key".to_string()))?;

        match key.status_at(Utc::now()) {
            KeyStatus::Usable => {}
            KeyStatus::Expired => {
                return Err(ApiError::Unauthorized("API key has expired".to_string()))
            }
            KeyStatus::Revoked => {
                tracing::warn!(key_prefix = %key.key_prefix, "Revoked API key presented");
                return Err(ApiError::Unauthorized(
                    "Invalid or missing API key".to_string(),
                ));
            }
        }

        // A failed touch never fails the request
        let key_id = key.id;
        tokio::spawn(async move {
            match repo.touch(key_id).await {
                Ok(true) => {}
                Ok(false) => tracing::debug!(key_id, "API key removed before last_used_at update"),
                Err(e) => tracing::warn!("Failed to update API key last_used_at: {}", e),
            }
        });

        Ok(ApiKeyAuth {
            api_key_id: key.id,
            key_prefix: key.key_prefix,
            is_admin: key.is_admin,
        })
    }
}
