// handlers/public/auth/login.rs - POST /api/login handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;

use super::CredentialsRequest;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/**
 * POST /api/login - Exchange username and password for a session token
 *
 * Unknown usernames and wrong passwords get the same 401 so the endpoint
 * cannot be used to enumerate accounts. The token is returned as `data`.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Json(request) = payload?;

    let token = state.users.login(&request.username, &request.password).await?;
    tracing::info!("User logged in: {}", request.username);

    Ok(ApiResponse::success(token).with_message("Login successful"))
}
