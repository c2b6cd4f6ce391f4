//! Shared application state

use sqlx::PgPool;
use std::sync::Arc;

use crate::events::EventQueue;
use crate::search::SearchIndex;

/// Cloned into every handler; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub index: Arc<dyn SearchIndex>,
    pub events: EventQueue,
}

impl AppState {
    pub fn new(pool: PgPool, index: Arc<dyn SearchIndex>, events: EventQueue) -> Self {
        Self {
            pool,
            index,
            events,
        }
    }
}
