//! Product change events
//!
//! Emitted by the catalog server after a committed product mutation and
//! consumed by the search indexer task. Upserts are keyed by product id,
//! so re-applying the same event is idempotent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::product::{AvailabilityStatus, ProductFull};

/// What happened to the product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductAction {
    Created,
    Updated,
    Deleted,
}

/// Change notification: entity snapshot plus action tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEvent {
    pub action: ProductAction,
    pub product_id: Uuid,
    /// Present for create/update, absent for delete
    pub document: Option<ProductDocument>,
}

impl ProductEvent {
    pub fn created(document: ProductDocument) -> Self {
        Self {
            action: ProductAction::Created,
            product_id: document.id,
            document: Some(document),
        }
    }

    pub fn updated(document: ProductDocument) -> Self {
        Self {
            action: ProductAction::Updated,
            product_id: document.id,
            document: Some(document),
        }
    }

    pub fn deleted(product_id: Uuid) -> Self {
        Self {
            action: ProductAction::Deleted,
            product_id,
            document: None,
        }
    }
}

/// Product document as stored in the search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    /// Effective price: sale price when set, base price otherwise
    pub price: Decimal,
    pub availability: AvailabilityStatus,
    pub rating: Decimal,
}

impl From<&ProductFull> for ProductDocument {
    fn from(full: &ProductFull) -> Self {
        let p = &full.product;
        Self {
            id: p.id,
            name: p.name.clone(),
            sku: p.sku.clone(),
            description: p.description.clone(),
            category_id: p.category_id,
            tag_ids: full.tags.iter().map(|t| t.id).collect(),
            price: p.sale_price.unwrap_or(p.base_price),
            availability: p.availability,
            rating: p.rating,
        }
    }
}
