use axum::extract::{Path, State};

use crate::database::models::ColorScheme;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /api/color-schemes/:id - any signed-in user may read any scheme
pub async fn scheme_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ColorScheme> {
    let scheme = state.schemes.get_by_id(&id).await?;
    Ok(ApiResponse::success(scheme))
}
