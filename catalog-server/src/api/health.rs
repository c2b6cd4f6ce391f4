//! Health, identity and pipeline counters

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use shared::error::{ApiResponse, AppError};

use super::ApiResult;
use crate::events::MetricsSnapshot;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub database: bool,
    pub search_index: bool,
}

/// GET / — service identity
pub async fn root() -> ApiResult<ServiceInfo> {
    Ok(Json(ApiResponse::success(ServiceInfo {
        service: "catalog-server",
        version: env!("CARGO_PKG_VERSION"),
    })))
}

/// GET /health — probe the database and the search index
pub async fn health_check(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();
    let search_index = state.index.health().await.is_ok();

    let status = HealthStatus {
        database,
        search_index,
    };
    if !database {
        return Err(AppError::dependency_unavailable("Database unavailable")
            .with_detail("search_index", search_index));
    }
    Ok(Json(ApiResponse::success(status)))
}

/// GET /metrics — event pipeline counters
pub async fn metrics(State(state): State<AppState>) -> ApiResult<MetricsSnapshot> {
    Ok(Json(ApiResponse::success(state.events.metrics().snapshot())))
}
