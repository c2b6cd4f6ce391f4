//! Visitor event rows, keyed by (source, date)

use chrono::NaiveDate;
use shared::models::analytics::{SourceTotal, VisitorEvent, VisitorEventUpsert};
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Per-source visitor sums over an inclusive date range
pub async fn totals(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<Vec<SourceTotal>> {
    let rows = sqlx::query_as(
        "SELECT source, COALESCE(SUM(visitors), 0)::bigint AS visitors \
         FROM visitor_events WHERE date BETWEEN $1 AND $2 \
         GROUP BY source ORDER BY source",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert or update the (source, date) row. With `increment` the count
/// is added to an existing row, otherwise it overwrites it.
pub async fn upsert(pool: &PgPool, payload: &VisitorEventUpsert) -> ServiceResult<VisitorEvent> {
    let saved = sqlx::query_as(
        "INSERT INTO visitor_events (source, date, visitors) VALUES ($1, $2, $3) \
         ON CONFLICT (source, date) DO UPDATE SET visitors = \
           CASE WHEN $4 THEN visitor_events.visitors + EXCLUDED.visitors \
                ELSE EXCLUDED.visitors END \
         RETURNING *",
    )
    .bind(&payload.source)
    .bind(payload.date)
    .bind(payload.visitors)
    .bind(payload.increment)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}
