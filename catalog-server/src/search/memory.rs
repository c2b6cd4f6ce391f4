//! In-memory product index
//!
//! Stands in for the real index when no SEARCH_URL is configured
//! (development) and backs the indexer tests. Filtering mirrors the
//! OpenSearch query semantics closely enough for both uses.

use async_trait::async_trait;
use shared::events::ProductDocument;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SearchError, SearchIndex, SearchQuery};

/// Map-backed index keyed by product id
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    docs: Arc<RwLock<HashMap<Uuid, ProductDocument>>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Fetch one document by product id
    pub async fn get(&self, id: Uuid) -> Option<ProductDocument> {
        self.docs.read().await.get(&id).cloned()
    }
}

fn matches(doc: &ProductDocument, query: &SearchQuery) -> bool {
    if let Some(q) = &query.q {
        let q = q.to_lowercase();
        let in_name = doc.name.to_lowercase().contains(&q);
        let in_description = doc
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&q));
        if !in_name && !in_description {
            return false;
        }
    }
    if let Some(name) = &query.name
        && !doc.name.to_lowercase().contains(&name.to_lowercase())
    {
        return false;
    }
    if let Some(sku) = &query.sku
        && doc.sku != *sku
    {
        return false;
    }
    if let Some(category_id) = query.category_id
        && doc.category_id != Some(category_id)
    {
        return false;
    }
    if let Some(tag_id) = query.tag_id
        && !doc.tag_ids.contains(&tag_id)
    {
        return false;
    }
    if let Some(availability) = query.availability
        && doc.availability != availability
    {
        return false;
    }
    if let Some(min) = query.min_price
        && doc.price < min
    {
        return false;
    }
    if let Some(max) = query.max_price
        && doc.price > max
    {
        return false;
    }
    if let Some(min_rating) = query.min_rating
        && doc.rating < min_rating
    {
        return false;
    }
    true
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn upsert(&self, doc: &ProductDocument) -> Result<(), SearchError> {
        self.docs.write().await.insert(doc.id, doc.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SearchError> {
        self.docs.write().await.remove(&id);
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductDocument>, SearchError> {
        let docs = self.docs.read().await;
        let mut hits: Vec<ProductDocument> =
            docs.values().filter(|d| matches(d, query)).cloned().collect();
        // Stable output order for paging
        hits.sort_by_key(|d| d.id);
        Ok(hits
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn health(&self) -> Result<(), SearchError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::product::AvailabilityStatus;

    fn doc(name: &str, price: i64) -> ProductDocument {
        ProductDocument {
            id: Uuid::new_v4(),
            name: name.to_string(),
            sku: format!("SKU-{name}"),
            description: None,
            category_id: None,
            tag_ids: vec![],
            price: Decimal::new(price, 0),
            availability: AvailabilityStatus::InStock,
            rating: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let index = MemoryIndex::new();
        let d = doc("Standing Desk", 400);
        index.upsert(&d).await.unwrap();
        index.upsert(&d).await.unwrap();
        assert_eq!(index.len().await, 1);
        assert_eq!(index.get(d.id).await.as_ref(), Some(&d));
    }

    #[tokio::test]
    async fn search_combines_filters_with_and() {
        let index = MemoryIndex::new();
        index.upsert(&doc("Standing Desk", 400)).await.unwrap();
        index.upsert(&doc("Office Chair", 150)).await.unwrap();

        let query = SearchQuery {
            q: Some("desk".into()),
            min_price: Some(Decimal::new(300, 0)),
            ..Default::default()
        };
        let hits = index.search(&query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Standing Desk");

        let query = SearchQuery {
            q: Some("desk".into()),
            min_price: Some(Decimal::new(500, 0)),
            ..Default::default()
        };
        assert!(index.search(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_tolerant_of_absent_documents() {
        let index = MemoryIndex::new();
        index.delete(Uuid::new_v4()).await.unwrap();
        assert_eq!(index.len().await, 0);
    }
}
