//! Promo code persistence

use serde::Deserialize;
use shared::error::AppError;
use shared::models::promo_code::{PromoCode, PromoCodeCreate, PromoCodeUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceResult;

/// List filters, combined with AND
#[derive(Debug, Clone, Deserialize)]
pub struct PromoCodeFilter {
    /// Case-insensitive substring match
    pub code: Option<String>,
    pub active: Option<bool>,
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list(pool: &PgPool, filter: &PromoCodeFilter) -> ServiceResult<Vec<PromoCode>> {
    let codes = sqlx::query_as(
        "SELECT * FROM promo_codes \
         WHERE ($1::text IS NULL OR code ILIKE '%' || $1 || '%') \
           AND ($2::bool IS NULL OR active = $2) \
         ORDER BY valid_from DESC LIMIT $3 OFFSET $4",
    )
    .bind(&filter.code)
    .bind(filter.active)
    .bind(filter.limit.max(0))
    .bind(filter.offset.max(0))
    .fetch_all(pool)
    .await?;
    Ok(codes)
}

pub async fn get(pool: &PgPool, id: Uuid) -> ServiceResult<PromoCode> {
    let code: Option<PromoCode> = sqlx::query_as("SELECT * FROM promo_codes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    code.ok_or_else(|| AppError::not_found("Promo code").into())
}

pub async fn create(pool: &PgPool, payload: PromoCodeCreate) -> ServiceResult<PromoCode> {
    let code = sqlx::query_as(
        "INSERT INTO promo_codes (id, code, discount_percent, active, valid_from, valid_until) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.code)
    .bind(payload.discount_percent)
    .bind(payload.active)
    .bind(payload.valid_from)
    .bind(payload.valid_until)
    .fetch_one(pool)
    .await?;
    Ok(code)
}

/// Partial update; an omitted `active` never deactivates an existing code.
pub async fn update(pool: &PgPool, id: Uuid, payload: PromoCodeUpdate) -> ServiceResult<PromoCode> {
    let code: Option<PromoCode> = sqlx::query_as(
        "UPDATE promo_codes SET \
           code = COALESCE($2, code), \
           discount_percent = COALESCE($3, discount_percent), \
           active = COALESCE($4, active), \
           valid_from = COALESCE($5, valid_from), \
           valid_until = COALESCE($6, valid_until) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&payload.code)
    .bind(payload.discount_percent)
    .bind(payload.active)
    .bind(payload.valid_from)
    .bind(payload.valid_until)
    .fetch_optional(pool)
    .await?;
    code.ok_or_else(|| AppError::not_found("Promo code").into())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Promo code").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_decodes_active_and_code() {
        let filter: PromoCodeFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.code.is_none());
        assert!(filter.active.is_none());
        assert_eq!(filter.limit, 10);

        let filter: PromoCodeFilter =
            serde_json::from_str(r#"{"code":"SUMMER","active":true}"#).unwrap();
        assert_eq!(filter.code.as_deref(), Some("SUMMER"));
        assert_eq!(filter.active, Some(true));
    }
}
