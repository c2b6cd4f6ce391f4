//! Search index consumer task
//!
//! Drains the product-event queue and applies each event to the search
//! index. An event is only taken off the queue once it has been applied:
//! failed applies are retried with backoff, giving at-least-once
//! semantics. Re-applying an event is harmless because upserts are keyed
//! by product id.

use shared::events::{ProductAction, ProductEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::IndexerMetrics;
use crate::search::{SearchError, SearchIndex};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Run the indexer until the queue closes.
pub async fn run(
    mut rx: mpsc::Receiver<ProductEvent>,
    index: Arc<dyn SearchIndex>,
    metrics: Arc<IndexerMetrics>,
) {
    tracing::info!("search indexer started");
    while let Some(event) = rx.recv().await {
        apply_with_retry(&*index, &event, &metrics).await;
    }
    tracing::info!("search indexer stopped, event queue closed");
}

async fn apply_with_retry(
    index: &dyn SearchIndex,
    event: &ProductEvent,
    metrics: &IndexerMetrics,
) {
    let mut attempt: u32 = 0;
    loop {
        match apply(index, event).await {
            Ok(()) => {
                metrics
                    .applied
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                return;
            }
            Err(e) => {
                metrics
                    .failed
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                attempt += 1;
                let backoff = Duration::from_secs(1u64 << attempt.min(5)).min(MAX_BACKOFF);
                tracing::warn!(
                    product_id = %event.product_id,
                    action = ?event.action,
                    attempt,
                    error = %e,
                    "index update failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

async fn apply(index: &dyn SearchIndex, event: &ProductEvent) -> Result<(), SearchError> {
    match (event.action, &event.document) {
        (ProductAction::Created | ProductAction::Updated, Some(doc)) => index.upsert(doc).await,
        (ProductAction::Deleted, _) => index.delete(event.product_id).await,
        (action, None) => {
            // Malformed event; nothing sensible to retry
            tracing::error!(product_id = %event.product_id, ?action, "event without document");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventQueue;
    use crate::search::{MemoryIndex, SearchQuery};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shared::events::ProductDocument;
    use shared::models::product::AvailabilityStatus;
    use std::sync::atomic::{AtomicU32, Ordering};
    use uuid::Uuid;

    fn doc(id: Uuid, name: &str) -> ProductDocument {
        ProductDocument {
            id,
            name: name.to_string(),
            sku: "SKU-1".to_string(),
            description: None,
            category_id: None,
            tag_ids: vec![],
            price: Decimal::new(100, 0),
            availability: AvailabilityStatus::InStock,
            rating: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn replayed_upsert_leaves_index_unchanged() {
        let index = MemoryIndex::new();
        let metrics = IndexerMetrics::default();
        let id = Uuid::new_v4();
        let event = ProductEvent::created(doc(id, "Desk"));

        apply_with_retry(&index, &event, &metrics).await;
        let after_first = index.get(id).await;
        apply_with_retry(&index, &event, &metrics).await;

        assert_eq!(index.len().await, 1);
        assert_eq!(index.get(id).await, after_first);
        assert_eq!(metrics.snapshot().applied, 2);
    }

    #[tokio::test]
    async fn delete_event_removes_document() {
        let index = MemoryIndex::new();
        let metrics = IndexerMetrics::default();
        let id = Uuid::new_v4();

        apply_with_retry(&index, &ProductEvent::created(doc(id, "Desk")), &metrics).await;
        apply_with_retry(&index, &ProductEvent::deleted(id), &metrics).await;
        assert_eq!(index.len().await, 0);
    }

    /// Index that fails a fixed number of applies before recovering
    struct FlakyIndex {
        inner: MemoryIndex,
        failures_left: AtomicU32,
    }

    #[async_trait]
    impl SearchIndex for FlakyIndex {
        async fn upsert(&self, doc: &ProductDocument) -> Result<(), SearchError> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(SearchError("index offline".into()));
            }
            self.inner.upsert(doc).await
        }

        async fn delete(&self, id: Uuid) -> Result<(), SearchError> {
            self.inner.delete(id).await
        }

        async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductDocument>, SearchError> {
            self.inner.search(query).await
        }

        async fn health(&self) -> Result<(), SearchError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_apply_is_redelivered_until_it_lands() {
        let index = FlakyIndex {
            inner: MemoryIndex::new(),
            failures_left: AtomicU32::new(2),
        };
        let metrics = IndexerMetrics::default();
        let id = Uuid::new_v4();

        apply_with_retry(&index, &ProductEvent::created(doc(id, "Desk")), &metrics).await;

        let snap = metrics.snapshot();
        assert_eq!(snap.applied, 1);
        assert_eq!(snap.failed, 2);
        assert_eq!(index.inner.len().await, 1);
    }

    #[tokio::test]
    async fn run_drains_queue_in_order_and_stops_on_close() {
        let index = Arc::new(MemoryIndex::new());
        let (queue, rx) = EventQueue::new(8);
        let metrics = queue.metrics();

        let id = Uuid::new_v4();
        queue.publish(ProductEvent::created(doc(id, "Desk")));
        queue.publish(ProductEvent::updated(doc(id, "Walnut Desk")));
        drop(queue);

        run(rx, index.clone(), metrics.clone()).await;

        assert_eq!(index.get(id).await.unwrap().name, "Walnut Desk");
        assert_eq!(metrics.snapshot().applied, 2);
    }
}
