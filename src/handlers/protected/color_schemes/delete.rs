use axum::extract::{Path, State};
use axum::Extension;

use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// DELETE /api/color-schemes/:id
pub async fn scheme_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.schemes.delete(&user, &id).await?;
    Ok(ApiResponse::message_only("Color scheme deleted"))
}
