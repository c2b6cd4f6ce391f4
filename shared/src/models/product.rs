//! Product models: products, variants, images

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::inventory::InventoryProduct;
use super::tag::Tag;

/// Product availability status, stored as the Postgres enum
/// `availability_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "availability_status", rename_all = "snake_case")
)]
pub enum AvailabilityStatus {
    InStock,
    OutOfStock,
    Preorder,
}

impl Default for AvailabilityStatus {
    fn default() -> Self {
        Self::InStock
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Unique within the table
    pub sku: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub sale_price: Option<Decimal>,
    pub availability: AvailabilityStatus,
    pub rating: Decimal,
    /// Category reference (never owned)
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation; always >= created_at
    pub updated_at: DateTime<Utc>,
}

/// Product with its relationships populated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFull {
    #[serde(flatten)]
    pub product: Product,
    pub tags: Vec<Tag>,
    pub variants: Vec<ProductVariant>,
    pub images: Vec<ProductImage>,
    pub inventory: Vec<InventoryProduct>,
}

/// Product variant entity (owned by a product, cascade-deleted)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_name: String,
    /// Unique within the table
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
}

/// Product image entity (owned by a product, cascade-deleted)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
}

// ==================== Payloads ====================

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub availability: AvailabilityStatus,
    pub rating: Option<Decimal>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub variants: Vec<ProductVariantCreate>,
    #[serde(default)]
    pub images: Vec<ProductImageCreate>,
    #[serde(default)]
    pub inventory: Vec<InventoryLinkCreate>,
}

/// Partial product update. Omitted fields are left untouched; `variants`
/// and `images` are reconciled by id when present, `inventory` links are
/// replaced wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub availability: Option<AvailabilityStatus>,
    pub rating: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub variants: Option<Vec<ProductVariantPatch>>,
    pub images: Option<Vec<ProductImagePatch>>,
    pub inventory: Option<Vec<InventoryLinkCreate>>,
}

/// Nested variant payload for product create
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductVariantCreate {
    #[validate(length(min = 1, max = 100))]
    pub variant_name: String,
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
}

/// Standalone variant create payload (POST /products/variants)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VariantCreate {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub variant_name: String,
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
}

/// Variant entry in a product update: with `id` it updates that variant
/// in place, without `id` it inserts a new one. Existing variants absent
/// from the submitted set are deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariantPatch {
    pub id: Option<Uuid>,
    pub variant_name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
}

/// Partial variant update (PUT /products/variants/{id})
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantUpdate {
    pub variant_name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

/// Nested image payload for product create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImageCreate {
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Image entry in a product update, reconciled by id like variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImagePatch {
    pub id: Option<Uuid>,
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Inventory link carried in product create/update payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLinkCreate {
    pub inventory_id: Uuid,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
}

pub(crate) fn default_low_stock_threshold() -> i32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_omitted_from_empty_variants() {
        let omitted: ProductUpdate = serde_json::from_str(r#"{"name":"Desk"}"#).unwrap();
        assert!(omitted.variants.is_none());

        let emptied: ProductUpdate =
            serde_json::from_str(r#"{"name":"Desk","variants":[]}"#).unwrap();
        assert_eq!(emptied.variants.as_deref(), Some(&[][..]));
    }

    #[test]
    fn availability_uses_snake_case_wire_format() {
        let json = serde_json::to_string(&AvailabilityStatus::OutOfStock).unwrap();
        assert_eq!(json, r#""out_of_stock""#);
        let back: AvailabilityStatus = serde_json::from_str(r#""preorder""#).unwrap();
        assert_eq!(back, AvailabilityStatus::Preorder);
    }

    #[test]
    fn create_defaults_apply() {
        let create: ProductCreate = serde_json::from_str(
            r#"{"name":"Desk","sku":"DSK-1","base_price":99.5}"#,
        )
        .unwrap();
        assert_eq!(create.availability, AvailabilityStatus::InStock);
        assert!(create.variants.is_empty());
        assert!(create.tag_ids.is_empty());
    }
}
