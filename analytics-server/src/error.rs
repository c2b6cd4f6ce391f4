//! Service-layer error type for the analytics server
//!
//! Same two-variant bridge as the catalog server: sqlx errors on one
//! side, business-rule errors on the other, both collapsing to an
//! `AppError` at the transport boundary.

use axum::response::IntoResponse;
use shared::error::AppError;

#[derive(Debug)]
pub enum ServiceError {
    /// Database error from sqlx
    Db(sqlx::Error),
    /// Business-rule error (already an AppError with the correct code)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                if let sqlx::Error::Database(ref db) = db_err {
                    if db.is_unique_violation() {
                        return AppError::conflict("Resource already exists");
                    }
                    if db.is_check_violation() {
                        return AppError::validation("Value violates a data constraint");
                    }
                }
                if matches!(
                    db_err,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                ) {
                    tracing::error!(error = %db_err, "database unreachable");
                    return AppError::dependency_unavailable("Database unavailable");
                }
                tracing::error!(error = %db_err, "service database error");
                AppError::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
