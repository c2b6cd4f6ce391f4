//! Database access layer
//!
//! Free functions per resource, taking `&PgPool` and returning
//! `ServiceResult`. Multi-row mutations run inside a single transaction;
//! sqlx errors are mapped to API errors at the `ServiceError` boundary.

pub mod category;
pub mod inventory;
pub mod product;
pub mod promo_code;
pub mod reconcile;
pub mod tag;
pub mod variant;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Page size applied when a list request carries no `limit`
pub(crate) fn default_limit() -> i64 {
    10
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
