//! Tag REST API

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppError};
use shared::models::tag::{Tag, TagCreate};
use uuid::Uuid;
use validator::Validate;

use super::ApiResult;
use crate::db::tag;
use crate::db::tag::TagFilter;
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TagFilter>,
) -> ApiResult<Vec<Tag>> {
    let tags = tag::list(&state.pool, &filter).await?;
    Ok(Json(ApiResponse::success(tags)))
}

/// POST /api/v1/tags
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TagCreate>,
) -> ApiResult<Tag> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let created = tag::create(&state.pool, payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// DELETE /api/v1/tags/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    tag::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}
