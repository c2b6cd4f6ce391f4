//! Outbound product-event queue
//!
//! Product mutations commit to the database first, then enqueue a change
//! event. Publishing is best-effort and never fails the committed
//! transaction: a full or closed queue is counted and logged. The queue
//! is drained by the indexer task, which applies events to the search
//! index at-least-once.

pub mod indexer;

use shared::events::ProductEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Observable counters for the publish/index pipeline
#[derive(Debug, Default)]
pub struct IndexerMetrics {
    /// Events accepted into the queue
    pub published: AtomicU64,
    /// Events rejected because the queue was full or closed
    pub dropped: AtomicU64,
    /// Events successfully applied to the index
    pub applied: AtomicU64,
    /// Failed index apply attempts (each retry counts)
    pub failed: AtomicU64,
}

/// Point-in-time snapshot of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub published: u64,
    pub dropped: u64,
    pub applied: u64,
    pub failed: u64,
}

impl IndexerMetrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            published: self.published.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Sending half of the event pipeline, cloned into request handlers
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: mpsc::Sender<ProductEvent>,
    metrics: Arc<IndexerMetrics>,
}

impl EventQueue {
    /// Create the queue; the receiver goes to [`indexer::run`].
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ProductEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                metrics: Arc::new(IndexerMetrics::default()),
            },
            rx,
        )
    }

    /// Best-effort publish. The database transaction has already
    /// committed; a rejected event is logged and counted, not retried.
    pub fn publish(&self, event: ProductEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.metrics.published.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "product event dropped, index will lag");
            }
        }
    }

    pub fn metrics(&self) -> Arc<IndexerMetrics> {
        Arc::clone(&self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::events::ProductEvent;
    use uuid::Uuid;

    #[tokio::test]
    async fn publish_counts_and_drops_when_full() {
        let (queue, _rx) = EventQueue::new(1);
        queue.publish(ProductEvent::deleted(Uuid::new_v4()));
        queue.publish(ProductEvent::deleted(Uuid::new_v4()));

        let snap = queue.metrics().snapshot();
        assert_eq!(snap.published, 1);
        assert_eq!(snap.dropped, 1);
    }

    #[tokio::test]
    async fn publish_survives_a_closed_receiver() {
        let (queue, rx) = EventQueue::new(4);
        drop(rx);
        queue.publish(ProductEvent::deleted(Uuid::new_v4()));
        assert_eq!(queue.metrics().snapshot().dropped, 1);
    }
}
