//! API routes for the analytics server
//!
//! Aggregations are served over WebSocket command sockets; event rows
//! are ingested over REST.

pub mod health;
pub mod kpis;
pub mod locations;
pub mod orders;
pub mod visitors;

use axum::routing::{get, post};
use axum::{Json, Router};
use shared::error::{ApiResponse, AppResult};

use crate::state::AppState;

/// Handlers return the uniform envelope or a typed error.
type ApiResult<T> = AppResult<Json<ApiResponse<T>>>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let sockets = Router::new()
        .route("/ws/kpis", get(kpis::ws))
        .route("/ws/visitor-events", get(visitors::ws))
        .route("/ws/user-location-stats", get(locations::ws));

    let ingest = Router::new()
        .route("/api/v1/kpis", post(kpis::ingest))
        .route(
            "/api/v1/order-events",
            get(orders::list).post(orders::ingest),
        )
        .route("/api/v1/visitor-events", post(visitors::ingest))
        .route("/api/v1/user-location-stats", post(locations::ingest));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .merge(sockets)
        .merge(ingest)
        .with_state(state)
}
