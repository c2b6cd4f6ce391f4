//! Promo code REST API

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppError};
use shared::models::promo_code::{PromoCode, PromoCodeCreate, PromoCodeUpdate};
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::db::promo_code;
use crate::db::promo_code::PromoCodeFilter;
use crate::state::AppState;

/// GET /api/v1/promo-codes
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PromoCodeFilter>,
) -> ApiResult<Vec<PromoCode>> {
    let codes = promo_code::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(codes)))
}

/// GET /api/v1/promo-codes/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<PromoCode> {
    let found = promo_code::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// POST /api/v1/promo-codes
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PromoCodeCreate>,
) -> ApiResult<PromoCode> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if payload.valid_until < payload.valid_from {
        return Err(AppError::validation(
            "valid_until must not precede valid_from",
        ));
    }
    let created = promo_code::create(&state.pool, payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// PUT /api/v1/promo-codes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PromoCodeUpdate>,
) -> ApiResult<PromoCode> {
    let updated = promo_code::update(&state.pool, id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/v1/promo-codes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    promo_code::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}
