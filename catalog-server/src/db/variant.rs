//! Standalone variant persistence (variants addressed by their own id)

use serde::Deserialize;
use shared::error::AppError;
use shared::models::product::{ProductVariant, VariantCreate, VariantUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceResult;

/// List filters, combined with AND
#[derive(Debug, Clone, Deserialize)]
pub struct VariantFilter {
    pub product_id: Option<Uuid>,
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list(pool: &PgPool, filter: &VariantFilter) -> ServiceResult<Vec<ProductVariant>> {
    let variants = sqlx::query_as(
        "SELECT * FROM product_variants \
         WHERE ($1::uuid IS NULL OR product_id = $1) \
         ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(filter.product_id)
    .bind(filter.limit.max(0))
    .bind(filter.offset.max(0))
    .fetch_all(pool)
    .await?;
    Ok(variants)
}

pub async fn create(pool: &PgPool, payload: VariantCreate) -> ServiceResult<ProductVariant> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(payload.product_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(AppError::not_found("Product").into());
    }

    let variant = sqlx::query_as(
        "INSERT INTO product_variants (id, product_id, variant_name, sku, price, stock) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.product_id)
    .bind(&payload.variant_name)
    .bind(&payload.sku)
    .bind(payload.price)
    .bind(payload.stock)
    .fetch_one(pool)
    .await?;
    Ok(variant)
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<ProductVariant> {
    let variant: Option<ProductVariant> =
        sqlx::query_as("SELECT * FROM product_variants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    variant.ok_or_else(|| AppError::not_found("Variant").into())
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    payload: VariantUpdate,
) -> ServiceResult<ProductVariant> {
    let variant: Option<ProductVariant> = sqlx::query_as(
        "UPDATE product_variants SET \
           variant_name = COALESCE($2, variant_name), \
           sku = COALESCE($3, sku), \
           price = COALESCE($4, price), \
           stock = COALESCE($5, stock) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.variant_name)
    .bind(&payload.sku)
    .bind(payload.price)
    .bind(payload.stock)
    .fetch_optional(pool)
    .await?;
    variant.ok_or_else(|| AppError::not_found("Variant").into())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM product_variants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Variant").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_decodes_product_id_and_paging() {
        let filter: VariantFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.product_id.is_none());
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset, 0);

        let id = Uuid::new_v4();
        let filter: VariantFilter =
            serde_json::from_str(&format!(r#"{{"product_id":"{id}","limit":2}}"#)).unwrap();
        assert_eq!(filter.product_id, Some(id));
        assert_eq!(filter.limit, 2);
    }
}
