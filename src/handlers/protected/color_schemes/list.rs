use axum::extract::State;
use axum::Extension;

use crate::auth::AuthUser;
use crate::database::models::ColorScheme;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /api/color-schemes - every scheme authored by the caller, `[]` when none
pub async fn schemes_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ColorScheme>> {
    let schemes = state.schemes.get_all_by_author(&user).await?;
    Ok(ApiResponse::success(schemes))
}
