use axum::extract::{rejection::JsonRejection, State};
use axum::{Extension, Json};

use crate::auth::AuthUser;
use crate::database::models::ColorScheme;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// PUT /api/color-schemes - full replace of a scheme the caller owns.
///
/// Color slots missing from the body are dropped.
pub async fn scheme_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ColorScheme>, JsonRejection>,
) -> ApiResult<ColorScheme> {
    let Json(scheme) = payload?;
    let updated = state.schemes.update(&user, scheme).await?;
    Ok(ApiResponse::success(updated))
}
