//! API routes for the catalog server

pub mod category;
pub mod health;
pub mod inventory;
pub mod product;
pub mod promo_code;
pub mod search;
pub mod tag;
pub mod variant;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use shared::error::{ApiResponse, AppResult};

use crate::state::AppState;

/// Handlers return the uniform envelope or a typed error.
type ApiResult<T> = AppResult<Json<ApiResponse<T>>>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let products = Router::new()
        .route("/api/v1/products", get(product::list).post(product::create))
        .route("/api/v1/products/search", get(search::search))
        .route(
            "/api/v1/products/variants",
            get(variant::list).post(variant::create),
        )
        .route(
            "/api/v1/products/variants/{id}",
            get(variant::get).put(variant::update).delete(variant::delete),
        )
        .route(
            "/api/v1/products/{id}",
            get(product::get).put(product::update).delete(product::delete),
        );

    let categories = Router::new()
        .route(
            "/api/v1/categories",
            get(category::list).post(category::create),
        )
        .route(
            "/api/v1/categories/{id}",
            get(category::get)
                .put(category::update)
                .delete(category::delete),
        );

    let tags = Router::new()
        .route("/api/v1/tags", get(tag::list).post(tag::create))
        .route("/api/v1/tags/{id}", delete(tag::delete));

    let inventories = Router::new()
        .route(
            "/api/v1/inventories",
            get(inventory::list).post(inventory::create),
        )
        .route(
            "/api/v1/inventories/{id}",
            get(inventory::get)
                .put(inventory::update)
                .delete(inventory::delete),
        )
        .route(
            "/api/v1/inventories/{id}/products",
            get(inventory::list_links),
        )
        .route("/api/v1/inventory-products", post(inventory::create_link))
        .route(
            "/api/v1/inventory-products/{id}",
            put(inventory::update_link).delete(inventory::delete_link),
        );

    let promo_codes = Router::new()
        .route(
            "/api/v1/promo-codes",
            get(promo_code::list).post(promo_code::create),
        )
        .route(
            "/api/v1/promo-codes/{id}",
            get(promo_code::get)
                .put(promo_code::update)
                .delete(promo_code::delete),
        );

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .merge(products)
        .merge(categories)
        .merge(tags)
        .merge(inventories)
        .merge(promo_codes)
        .with_state(state)
}
