//! catalog-server — products service
//!
//! Long-running service that:
//! - Serves REST CRUD for products, categories, tags, inventories and
//!   promo codes over PostgreSQL
//! - Serves full-text product search from the document index
//! - Keeps the search index eventually consistent through an outbound
//!   event queue drained by a background indexer task

mod api;
mod config;
mod db;
mod error;
mod events;
mod search;
mod state;

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use events::EventQueue;
use search::{MemoryIndex, OpenSearchIndex, SearchIndex};
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting catalog-server (env: {})", config.environment);

    let pool = db::connect(&config.database_url).await?;
    let index = build_index(&config).await?;

    let (events, rx) = EventQueue::new(config.event_queue_capacity);
    tokio::spawn(events::indexer::run(rx, index.clone(), events.metrics()));

    let state = AppState::new(pool, index, events);
    let app = api::create_router(state).layer(TraceLayer::new_for_http()).layer(build_cors(&config));

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("catalog-server HTTP listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pick the search index backend: OpenSearch when configured, otherwise
/// an in-memory index that only lives as long as the process.
async fn build_index(config: &Config) -> Result<Arc<dyn SearchIndex>, BoxError> {
    match &config.search_url {
        Some(url) => {
            let index = OpenSearchIndex::new(
                url,
                config.search_username.as_deref(),
                config.search_password.as_deref(),
                &config.search_index,
            )?;
            index.ensure_index().await?;
            tracing::info!(url = %url, index = %config.search_index, "using OpenSearch index");
            Ok(Arc::new(index))
        }
        None => {
            tracing::warn!("SEARCH_URL not set, using in-memory product index");
            Ok(Arc::new(MemoryIndex::new()))
        }
    }
}

fn build_cors(config: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any)
}
