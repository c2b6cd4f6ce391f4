//! Tag model

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Tag entity. Linked to products through the `product_tags` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tag {
    pub id: Uuid,
    /// Unique within the table
    pub name: String,
}

/// Create tag payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagCreate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}
