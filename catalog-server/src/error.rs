//! Service-layer error type for the catalog server
//!
//! `ServiceError` bridges the gap between DB-layer errors (`sqlx::Error`)
//! and the API-layer error (`AppError`). It enables `?` propagation
//! without manual `.map_err(...)` boilerplate in every handler.

use axum::response::IntoResponse;
use shared::error::AppError;

/// Service-layer error — only two variants, keeps things simple.
///
/// - `Db`: database/infrastructure errors (logged, mapped by kind)
/// - `App`: business-rule errors (transparent pass-through to client)
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
                    if db.is_foreign_key_violation() {
                        return AppError::validation("Referenced entity does not exist");
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

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug, Clone, Copy)]
    enum Violation {
        Check,
        Unique,
    }

    #[derive(Debug)]
    struct StubDbError(Violation);

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violated")
        }
    }

    impl std::error::Error for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                Violation::Check => ErrorKind::CheckViolation,
                Violation::Unique => ErrorKind::UniqueViolation,
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(violation: Violation) -> ServiceError {
        ServiceError::Db(sqlx::Error::Database(Box::new(StubDbError(violation))))
    }

    #[test]
    fn check_violation_maps_to_validation() {
        // negative stock, out-of-range discount and the like are 422s
        let app: AppError = db_error(Violation::Check).into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let app: AppError = db_error(Violation::Unique).into();
        assert_eq!(app.code, ErrorCode::Conflict);
    }
}
