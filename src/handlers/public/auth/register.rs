// handlers/public/auth/register.rs - POST /api/register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::CredentialsRequest;
use crate::error::ApiError;
use crate::middleware::response::envelope;
use crate::AppState;

/**
 * POST /api/register - Register new user account
 *
 * Expected Input:
 * ```json
 * {
 *   "username": "string",   // 3-50 chars, letters/digits/_/-, starts alphanumeric
 *   "password": "string"    // at least 8 characters
 * }
 * ```
 *
 * Responds 201 with `{message, code, token}` so the new account can be used
 * immediately. An existing username is a 409.
 */
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let token = state.users.register(&request.username, &request.password).await?;
    tracing::info!("Registered user: {}", request.username);

    let mut body = envelope("User registered successfully", StatusCode::CREATED);
    body["token"] = token.into();

    Ok((StatusCode::CREATED, Json(body)).into_response())
}
