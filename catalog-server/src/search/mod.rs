//! Product search index abstraction
//!
//! The indexer task and the search endpoint talk to a [`SearchIndex`]
//! trait object, constructed once at startup and injected through
//! `AppState`. Production uses the OpenSearch-backed implementation;
//! development without a configured index (and tests) use the in-memory
//! one.

mod memory;
mod opensearch;

pub use memory::MemoryIndex;
pub use opensearch::OpenSearchIndex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::events::ProductDocument;
use shared::models::product::AvailabilityStatus;
use thiserror::Error;
use uuid::Uuid;

/// Search index failure. Carries a message only; callers map it to
/// `DependencyUnavailable`.
#[derive(Debug, Error)]
#[error("search index error: {0}")]
pub struct SearchError(pub String);

impl From<::opensearch::Error> for SearchError {
    fn from(e: ::opensearch::Error) -> Self {
        SearchError(e.to_string())
    }
}

/// Product search parameters. All filters are combined with AND.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Full-text query over name and description
    pub q: Option<String>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub availability: Option<AvailabilityStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<Decimal>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            q: None,
            name: None,
            sku: None,
            category_id: None,
            tag_id: None,
            availability: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Document store mirroring products, keyed by product id.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Insert-or-update the document for its product id. Idempotent.
    async fn upsert(&self, doc: &ProductDocument) -> Result<(), SearchError>;

    /// Remove the document; absent documents are not an error.
    async fn delete(&self, id: Uuid) -> Result<(), SearchError>;

    /// Query documents matching all provided filters.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductDocument>, SearchError>;

    /// Probe reachability.
    async fn health(&self) -> Result<(), SearchError>;
}
