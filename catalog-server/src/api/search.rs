//! Product search endpoint, served from the document index

use axum::Json;
use axum::extract::{Query, State};
use shared::error::{ApiResponse, AppError};
use shared::events::ProductDocument;

use super::ApiResult;
use crate::search::SearchQuery;
use crate::state::AppState;

/// GET /api/v1/products/search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<ProductDocument>> {
    let hits = state.index.search(&query).await.map_err(|e| {
        tracing::error!(error = %e, "product search failed");
        AppError::dependency_unavailable("Search index unavailable")
    })?;
    Ok(Json(ApiResponse::success(hits)))
}
