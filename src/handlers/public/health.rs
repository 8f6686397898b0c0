// handlers/public/health.rs - GET /health handler

use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// GET /health - 200 while the database answers, 503 otherwise
pub async fn health_get(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    match state.database.health_check().await {
        Ok(()) => Ok(ApiResponse::success(HealthStatus {
            status: "ok",
            database: state.database.backend().as_str(),
            timestamp: chrono::Utc::now(),
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("Database unavailable"))
        }
    }
}
