use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, AuthUser};
use crate::error::ApiError;
use crate::AppState;

const INVALID_TOKEN: &str = "Invalid or expired token";

/// JWT authentication middleware that validates tokens and extracts user context.
///
/// Requests without a verified bearer token never reach the handler.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let username = state.authenticator.verify_token(&token).map_err(|e| {
        match e {
            AuthError::ExpiredToken => tracing::debug!("Rejected expired token"),
            other => tracing::debug!("Rejected token: {}", other),
        }
        ApiError::unauthorized(INVALID_TOKEN)
    })?;

    request.extensions_mut().insert(AuthUser { username });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
