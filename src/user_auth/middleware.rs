use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::service::{Claims, extract_token};
use crate::gateway::{error::ApiError, state::AppState};

pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Shared by the middleware and handlers whose auth depends on the query.
pub fn authenticate(
    state: &AppState,
    headers: &axum::http::HeaderMap,
) -> Result<Claims, ApiError> {
    let token = extract_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

    state.tokens.verify_token(token).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        ApiError::Unauthorized("Invalid or expired token. Please log in again.".into())
    })
}
