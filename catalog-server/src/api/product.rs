//! Product REST API
//!
//! Write operations commit to Postgres first, then enqueue a change
//! event for the search indexer. Publishing never fails the request.

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppError};
use shared::events::{ProductDocument, ProductEvent};
use shared::models::product::{ProductCreate, ProductFull, ProductUpdate};
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::db::product;
use crate::db::product::ProductFilter;
use crate::state::AppState;

/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Vec<ProductFull>> {
    let products = product::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/v1/products/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProductFull> {
    let full = product::get_full(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(full)))
}

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductCreate>,
) -> ApiResult<ProductFull> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let full = product::create(&state.pool, payload).await?;
    state
        .events
        .publish(ProductEvent::created(ProductDocument::from(&full)));
    Ok(Json(ApiResponse::success(full)))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<ProductFull> {
    let full = product::update(&state.pool, id, payload).await?;
    state
        .events
        .publish(ProductEvent::updated(ProductDocument::from(&full)));
    Ok(Json(ApiResponse::success(full)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    product::delete(&state.pool, id).await?;
    state.events.publish(ProductEvent::deleted(id));
    Ok(Json(ApiResponse::ok()))
}
