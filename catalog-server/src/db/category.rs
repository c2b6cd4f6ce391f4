//! Category persistence

use serde::Deserialize;
use shared::error::AppError;
use shared::models::category::{Category, CategoryCreate, CategoryUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceResult;

/// List filters, combined with AND
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFilter {
    /// Case-insensitive substring match
    pub name: Option<String>,
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list(pool: &PgPool, filter: &CategoryFilter) -> ServiceResult<Vec<Category>> {
    let categories = sqlx::query_as(
        "SELECT * FROM categories \
         WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
         ORDER BY name LIMIT $2 OFFSET $3",
    )
    .bind(&filter.name)
    .bind(filter.limit.max(0))
    .bind(filter.offset.max(0))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<Category> {
    let category: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    category.ok_or_else(|| AppError::not_found("Category").into())
}

pub async fn create(pool: &PgPool, payload: CategoryCreate) -> ServiceResult<Category> {
    let category = sqlx::query_as(
        "INSERT INTO categories (id, name, description) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

pub async fn update(pool: &PgPool, id: Uuid, payload: CategoryUpdate) -> ServiceResult<Category> {
    let category: Option<Category> = sqlx::query_as(
        "UPDATE categories SET \
           name = COALESCE($2, name), \
           description = COALESCE($3, description) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_optional(pool)
    .await?;
    category.ok_or_else(|| AppError::not_found("Category").into())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_defaults_to_the_first_page() {
        let filter: CategoryFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.name.is_none());
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset, 0);

        let filter: CategoryFilter =
            serde_json::from_str(r#"{"name":"desk","limit":5,"offset":20}"#).unwrap();
        assert_eq!(filter.name.as_deref(), Some("desk"));
        assert_eq!(filter.limit, 5);
        assert_eq!(filter.offset, 20);
    }
}
