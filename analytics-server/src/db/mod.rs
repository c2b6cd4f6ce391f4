//! Database access layer for the analytics tables

pub mod kpis;
pub mod locations;
pub mod order_events;
pub mod visitors;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Calendar bucket used by the time-series aggregations. Weeks start on
/// Monday, per `date_trunc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketUnit {
    Week,
    Month,
    Year,
}

impl BucketUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            BucketUnit::Week => "week",
            BucketUnit::Month => "month",
            BucketUnit::Year => "year",
        }
    }
}

/// Connect to PostgreSQL and run pending migrations.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
