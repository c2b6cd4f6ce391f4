//! Shared types for the Marlin services
//!
//! Common types used across the catalog and analytics servers:
//! domain models, error types, the API response envelope, WebSocket
//! command types and product change events.

pub mod error;
pub mod events;
pub mod models;
pub mod ws;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use events::{ProductAction, ProductDocument, ProductEvent};
pub use ws::WsReply;
