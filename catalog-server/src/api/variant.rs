//! Standalone variant REST API

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppError};
use shared::models::product::{ProductVariant, VariantCreate, VariantUpdate};
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::db::variant;
use crate::db::variant::VariantFilter;
use crate::state::AppState;

/// GET /api/v1/products/variants
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<VariantFilter>,
) -> ApiResult<Vec<ProductVariant>> {
    let variants = variant::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(variants)))
}

/// POST /api/v1/products/variants
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<VariantCreate>,
) -> ApiResult<ProductVariant> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let created = variant::create(&state.pool, payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// GET /api/v1/products/variants/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProductVariant> {
    let found = variant::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// PUT /api/v1/products/variants/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VariantUpdate>,
) -> ApiResult<ProductVariant> {
    let updated = variant::update(&state.pool, id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/products/variants/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    variant::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}
