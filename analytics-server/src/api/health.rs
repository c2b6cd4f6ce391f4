//! Health and identity

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use shared::error::{ApiResponse, AppError};

use super::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// GET / — service identity
pub async fn root() -> ApiResult<ServiceInfo> {
    Ok(Json(ApiResponse::success(ServiceInfo {
        service: "analytics-server",
        version: env!("CARGO_PKG_VERSION"),
    })))
}

/// GET /health — probe the database
pub async fn health_check(State(state): State<AppState>) -> ApiResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "health check failed");
            AppError::dependency_unavailable("Database unavailable")
        })?;
    Ok(Json(ApiResponse::ok()))
}
