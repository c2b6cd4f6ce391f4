//! Inventory REST API: warehouses and their product stock links

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppError};
use shared::models::inventory::{
    Inventory, InventoryCreate, InventoryProduct, InventoryProductCreate, InventoryProductUpdate,
    InventoryUpdate,
};
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::db::inventory;
use crate::db::inventory::{InventoryFilter, LinkFilter};
use crate::state::AppState;

/// GET /api/v1/inventories
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<InventoryFilter>,
) -> ApiResult<Vec<Inventory>> {
    let inventories = inventory::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(inventories)))
}

/// GET /api/v1/inventories/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Inventory> {
    let found = inventory::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// POST /api/v1/inventories
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<InventoryCreate>,
) -> ApiResult<Inventory> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let created = inventory::create(&state.pool, payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// PUT /api/v1/inventories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InventoryUpdate>,
) -> ApiResult<Inventory> {
    let updated = inventory::update(&state.pool, id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/inventories/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    inventory::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// GET /api/v1/inventories/{id}/products
pub async fn list_links(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(filter): Query<LinkFilter>,
) -> ApiResult<Vec<InventoryProduct>> {
    // 404 for an unknown inventory rather than an empty list
    inventory::get(&state.pool, id).await?;
    let links = inventory::list_links(&state.pool, id, &filter).await?;
    Ok(Json(ApiResponse::success(links)))
}

/// POST /api/v1/inventory-products
pub async fn create_link(
    State(state): State<AppState>,
    Json(payload): Json<InventoryProductCreate>,
) -> ApiResult<InventoryProduct> {
    let created = inventory::create_link(&state.pool, payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// PUT /api/v1/inventory-products/{id}
pub async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InventoryProductUpdate>,
) -> ApiResult<InventoryProduct> {
    let updated = inventory::update_link(&state.pool, id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/inventory-products/{id}
pub async fn delete_link(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    inventory::delete_link(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}
