use axum::extract::{rejection::JsonRejection, State};
use axum::{Extension, Json};

use crate::auth::AuthUser;
use crate::database::models::ColorScheme;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/**
 * POST /api/color-schemes - Store a new scheme
 *
 * Expected Input:
 * ```json
 * {
 *   "id": "string",                  // Optional: generated when empty
 *   "name": "string",                // Required
 *   "category": "string",            // Optional
 *   "colors": { "slot": "#rrggbb" }  // Optional
 * }
 * ```
 *
 * Any `author` in the body is ignored; the caller becomes the author.
 * Returns the stored scheme.
 */
pub async fn scheme_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ColorScheme>, JsonRejection>,
) -> ApiResult<ColorScheme> {
    let Json(scheme) = payload?;
    let created = state.schemes.create(&user, scheme).await?;
    Ok(ApiResponse::success(created))
}
