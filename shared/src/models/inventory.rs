//! Inventory models: inventories and inventory-product links

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::product::default_low_stock_threshold;

/// Inventory (warehouse/location) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Inventory {
    pub id: Uuid,
    /// Unique within the table
    pub name: String,
    pub location: Option<String>,
}

/// Association between an inventory and a product, carrying stock data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryProduct {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub low_stock_threshold: i32,
}

/// Create inventory payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InventoryCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub location: Option<String>,
}

/// Partial inventory update. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Create inventory-product link payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryProductCreate {
    pub inventory_id: Uuid,
    pub product_id: Uuid,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
}

/// Partial inventory-product link update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryProductUpdate {
    pub quantity: Option<i32>,
    pub low_stock_threshold: Option<i32>,
}
