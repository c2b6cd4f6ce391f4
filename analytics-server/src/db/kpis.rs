//! Daily KPI rows and their time-bucketed aggregations

use chrono::NaiveDate;
use shared::models::analytics::{DailyKpis, KpiBucket};
use sqlx::PgPool;

use super::BucketUnit;
use crate::error::ServiceResult;

/// Daily rows, optionally bounded by an inclusive date range
pub async fn daily(
    pool: &PgPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ServiceResult<Vec<DailyKpis>> {
    let rows = sqlx::query_as(
        "SELECT * FROM daily_kpis \
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
) -> ServiceResult<Vec<KpiBucket>> {
    let rows = sqlx::query_as(
        "SELECT date_trunc($1, date::timestamp)::date AS bucket_start, \
                COALESCE(SUM(total_orders), 0)::bigint AS total_orders, \
                COALESCE(SUM(total_revenue), 0)::float8 AS total_revenue, \
                COALESCE(SUM(total_customers), 0)::bigint AS total_customers, \
                COALESCE(SUM(total_earnings), 0)::float8 AS total_earnings \
         FROM daily_kpis \
         WHERE $2::int IS NULL OR EXTRACT(YEAR FROM date) = $2 \
         GROUP BY bucket_start ORDER BY bucket_start",
    )
    .bind(unit.as_str())
    .bind(year)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// (month, orders, revenue) sums for one year, only populated months
pub async fn monthly_rows(pool: &PgPool, year: i32) -> ServiceResult<Vec<(u32, i64, f64)>> {
    let rows: Vec<(i32, i64, f64)> = sqlx::query_as(
        "SELECT EXTRACT(MONTH FROM date)::int AS month, \
                COALESCE(SUM(total_orders), 0)::bigint AS total_orders, \
                COALESCE(SUM(total_revenue), 0)::float8 AS total_revenue \
         FROM daily_kpis WHERE EXTRACT(YEAR FROM date) = $1 \
         GROUP BY month ORDER BY month",
    )
    .bind(year)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(m, orders, revenue)| (m as u32, orders, revenue))
        .collect())
}

/// Insert or overwrite the row for a date
pub async fn upsert(pool: &PgPool, row: &DailyKpis) -> ServiceResult<DailyKpis> {
    let saved = sqlx::query_as(
        "INSERT INTO daily_kpis (date, total_orders, total_revenue, total_customers, total_earnings) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (date) DO UPDATE SET \
           total_orders = EXCLUDED.total_orders, \
           total_revenue = EXCLUDED.total_revenue, \
           total_customers = EXCLUDED.total_customers, \
           total_earnings = EXCLUDED.total_earnings \
         RETURNING *",
    )
    .bind(row.date)
    .bind(row.total_orders)
    .bind(row.total_revenue)
    .bind(row.total_customers)
    .bind(row.total_earnings)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}
