//! Category REST API

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppError};
use shared::models::category::{Category, CategoryCreate, CategoryUpdate};
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::db::category;
use crate::db::category::CategoryFilter;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> ApiResult<Vec<Category>> {
    let categories = category::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// GET /api/v1/categories/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Category> {
    let found = category::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryCreate>,
) -> ApiResult<Category> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let created = category::create(&state.pool, payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> ApiResult<Category> {
    let updated = category::update(&state.pool, id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    category::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}
