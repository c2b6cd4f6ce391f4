//! Order event rows, bucketed the same way as the KPIs

use chrono::NaiveDate;
use shared::models::analytics::{OrderBucket, OrderEvent};
use sqlx::PgPool;

use super::BucketUnit;
use crate::error::ServiceResult;

/// Daily rows, optionally bounded by an inclusive date range
pub async fn daily(
    pool: &PgPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ServiceResult<Vec<OrderEvent>> {
    let rows = sqlx::query_as(
        "SELECT * FROM order_events \
         WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2) \
         ORDER BY date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sums per calendar bucket, keyed by the bucket's first day
pub async fn buckets(
    pool: &PgPool,
    unit: BucketUnit,
    year: Option<i32>,
) -> ServiceResult<Vec<OrderBucket>> {
    let rows = sqlx::query_as(
        "SELECT date_trunc($1, date::timestamp)::date AS bucket_start, \
                COALESCE(SUM(total_orders), 0)::bigint AS total_orders, \
                COALESCE(SUM(total_revenue), 0)::float8 AS total_revenue, \
                COALESCE(SUM(total_earnings), 0)::float8 AS total_earnings \
         FROM order_events \
         WHERE $2::int IS NULL OR EXTRACT(YEAR FROM date) = $2 \
         GROUP BY bucket_start ORDER BY bucket_start",
    )
    .bind(unit.as_str())
    .bind(year)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert or overwrite the row for a date
pub async fn upsert(pool: &PgPool, row: &OrderEvent) -> ServiceResult<OrderEvent> {
    let saved = sqlx::query_as(
        "INSERT INTO order_events (date, total_orders, total_revenue, total_earnings) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (date) DO UPDATE SET \
           total_orders = EXCLUDED.total_orders, \
           total_revenue = EXCLUDED.total_revenue, \
           total_earnings = EXCLUDED.total_earnings \
         RETURNING *",
    )
    .bind(row.date)
    .bind(row.total_orders)
    .bind(row.total_revenue)
    .bind(row.total_earnings)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}
