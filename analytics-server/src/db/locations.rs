//! User location rows, keyed by (country, state, date)

use chrono::NaiveDate;
use shared::models::analytics::{LocationTotal, UserLocationStat};
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Per-(country, state) user sums over an inclusive date range
pub async fn totals(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<Vec<LocationTotal>> {
    let rows = sqlx::query_as(
        "SELECT country, state, COALESCE(SUM(users), 0)::bigint AS users \
         FROM user_location_stats WHERE date BETWEEN $1 AND $2 \
         GROUP BY country, state ORDER BY users DESC, country, state",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert or overwrite the (country, state, date) row
pub async fn upsert(pool: &PgPool, row: &UserLocationStat) -> ServiceResult<UserLocationStat> {
    let saved = sqlx::query_as(
        "INSERT INTO user_location_stats (country, state, date, users) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (country, state, date) DO UPDATE SET users = EXCLUDED.users \
         RETURNING *",
    )
    .bind(&row.country)
    .bind(&row.state)
    .bind(row.date)
    .bind(row.users)
    .fetch_one(pool)
    .await?;
    Ok(saved)
}
