//! Inventory and inventory-product link persistence

use serde::Deserialize;
use shared::error::AppError;
use shared::models::inventory::{
    Inventory, InventoryCreate, InventoryProduct, InventoryProductCreate, InventoryProductUpdate,
    InventoryUpdate,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceResult;

/// List filters, combined with AND
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryFilter {
    /// Case-insensitive substring match
    pub name: Option<String>,
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Pagination for the stock rows of one inventory
#[derive(Debug, Clone, Deserialize)]
pub struct LinkFilter {
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list(pool: &PgPool, filter: &InventoryFilter) -> ServiceResult<Vec<Inventory>> {
    let inventories = sqlx::query_as(
        "SELECT * FROM inventories \
         WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
         ORDER BY name LIMIT $2 OFFSET $3",
    )
    .bind(&filter.name)
    .bind(filter.limit.max(0))
    .bind(filter.offset.max(0))
    .fetch_all(pool)
    .await?;
    Ok(inventories)
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<Inventory> {
    let inventory: Option<Inventory> = sqlx::query_as("SELECT * FROM inventories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    inventory.ok_or_else(|| AppError::not_found("Inventory").into())
}

pub async fn create(pool: &PgPool, payload: InventoryCreate) -> ServiceResult<Inventory> {
    let inventory = sqlx::query_as(
        "INSERT INTO inventories (id, name, location) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.location)
    .fetch_one(pool)
    .await?;
    Ok(inventory)
}

pub async fn update(pool: &PgPool, id: Uuid, payload: InventoryUpdate) -> ServiceResult<Inventory> {
    let inventory: Option<Inventory> = sqlx::query_as(
        "UPDATE inventories SET \
           name = COALESCE($2, name), \
           location = COALESCE($3, location) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.location)
    .fetch_optional(pool)
    .await?;
    inventory.ok_or_else(|| AppError::not_found("Inventory").into())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM inventories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Inventory").into());
    }
    Ok(())
}

// ==================== inventory-product links ====================

/// Stock rows for one inventory
pub async fn list_links(
    pool: &PgPool,
    inventory_id: Uuid,
    filter: &LinkFilter,
) -> ServiceResult<Vec<InventoryProduct>> {
    let links = sqlx::query_as(
        "SELECT * FROM inventory_products WHERE inventory_id = $1 \
         ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(inventory_id)
    .bind(filter.limit.max(0))
    .bind(filter.offset.max(0))
    .fetch_all(pool)
    .await?;
    Ok(links)
}

pub async fn create_link(
    pool: &PgPool,
    payload: InventoryProductCreate,
) -> ServiceResult<InventoryProduct> {
    let link = sqlx::query_as(
        "INSERT INTO inventory_products (id, inventory_id, product_id, quantity, low_stock_threshold) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.inventory_id)
    .bind(payload.product_id)
    .bind(payload.quantity)
    .bind(payload.low_stock_threshold)
    .fetch_one(pool)
    .await?;
    Ok(link)
}

pub async fn update_link(
    pool: &PgPool,
    id: Uuid,
    payload: InventoryProductUpdate,
) -> ServiceResult<InventoryProduct> {
    let link: Option<InventoryProduct> = sqlx::query_as(
        "UPDATE inventory_products SET \
           quantity = COALESCE($2, quantity), \
           low_stock_threshold = COALESCE($3, low_stock_threshold) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(payload.quantity)
    .bind(payload.low_stock_threshold)
    .fetch_optional(pool)
    .await?;
    link.ok_or_else(|| AppError::not_found("Inventory link").into())
}

pub async fn delete_link(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM inventory_products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Inventory link").into());
    }
    Ok(())
}
