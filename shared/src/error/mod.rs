//! Unified error handling for the Marlin services
//!
//! Services raise [`AppError`] with a typed [`ErrorCode`]; the transport
//! layer turns it into the uniform [`ApiResponse`] envelope.

mod codes;
mod types;

pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult};
