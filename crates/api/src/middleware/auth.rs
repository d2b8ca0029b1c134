//! Authentication middleware.
//!
//! Validates the `X-API-Key` header and stores the authenticated key in
//! request extensions for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_key::{api_key_header, ApiKeyAuth};

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<ApiKeyAuth, ApiError> {
    let api_key = api_key_header(headers)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API key".to_string()))?;
    ApiKeyAuth::validate(&state.pool, api_key).await
}

/// Requires any valid API key.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let authenticated = authenticate(&state, req.headers()).await;
    match authenticated {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

/// Requires a valid API key with admin privileges.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let authenticated = authenticate(&state, req.headers()).await;
    match authenticated {
        Ok(auth) if auth.is_admin => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Ok(auth) => {
            tracing::warn!(api_key_id = auth.api_key_id, "Non-admin key on admin route");
            ApiError::Forbidden("Admin access required".to_string()).into_response()
        }
        Err(err) => err.into_response(),
    }
}
