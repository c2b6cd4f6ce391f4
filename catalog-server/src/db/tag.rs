//! Tag persistence

use serde::Deserialize;
use shared::error::AppError;
use shared::models::tag::{Tag, TagCreate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceResult;

/// List filters, combined with AND
#[derive(Debug, Clone, Deserialize)]
pub struct TagFilter {
    /// Case-insensitive substring match
    pub name: Option<String>,
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list(pool: &PgPool, filter: &TagFilter) -> ServiceResult<Vec<Tag>> {
    let tags = sqlx::query_as(
        "SELECT * FROM tags \
         WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
         ORDER BY name LIMIT $2 OFFSET $3",
    )
    .bind(&filter.name)
    .bind(filter.limit.max(0))
    .bind(filter.offset.max(0))
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

pub async fn create(pool: &PgPool, payload: TagCreate) -> ServiceResult<Tag> {
    let tag = sqlx::query_as("INSERT INTO tags (id, name) VALUES ($1, $2) RETURNING *")
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .fetch_one(pool)
        .await?;
    Ok(tag)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Tag").into());
    }
    Ok(())
}
