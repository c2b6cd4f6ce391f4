//! Order event REST endpoints: bucketed reads and ingest

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::analytics::{OrderBucket, OrderEvent};

use super::ApiResult;
use crate::db::{self, BucketUnit};
use crate::state::AppState;

/// Query parameters for GET /api/v1/order-events
#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    /// daily (default) | weekly | monthly | yearly
    #[serde(default)]
    pub bucket: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
}

/// Daily rows or calendar-bucket sums, depending on `bucket`
#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum OrderData {
    Daily(Vec<OrderEvent>),
    Buckets(Vec<OrderBucket>),
}

/// GET /api/v1/order-events
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<OrderData> {
    let data = match query.bucket.as_deref() {
        None | Some("daily") => OrderData::Daily(
            db::order_events::daily(&state.pool, query.start_date, query.end_date).await?,
        ),
        Some("weekly") => OrderData::Buckets(
            db::order_events::buckets(&state.pool, BucketUnit::Week, query.year).await?,
        ),
        Some("monthly") => OrderData::Buckets(
            db::order_events::buckets(&state.pool, BucketUnit::Month, query.year).await?,
        ),
        Some("yearly") => OrderData::Buckets(
            db::order_events::buckets(&state.pool, BucketUnit::Year, query.year).await?,
        ),
        Some(other) => {
            return Err(AppError::validation(format!("Unknown bucket '{other}'")));
        }
    };
    Ok(Json(ApiResponse::success(data)))
}

/// POST /api/v1/order-events — upsert the row for a date
pub async fn ingest(
    State(state): State<AppState>,
    Json(payload): Json<OrderEvent>,
) -> ApiResult<OrderEvent> {
    let saved = db::order_events::upsert(&state.pool, &payload).await?;
    Ok(Json(ApiResponse::success(saved)))
}
