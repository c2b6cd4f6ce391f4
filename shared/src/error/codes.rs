//! Error codes shared by all Marlin services
//!
//! Codes are HTTP-like u16 values so clients can branch on them without
//! parsing the message string.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed error code carried by every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    /// Operation completed successfully
    Success = 0,
    /// Malformed or missing input
    ValidationFailed = 422,
    /// Entity absent
    NotFound = 404,
    /// Uniqueness violation
    Conflict = 409,
    /// Store, queue or search index unreachable
    DependencyUnavailable = 503,
    /// Anything unexpected
    Internal = 500,
}

impl ErrorCode {
    /// Numeric wire value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// HTTP status used when this code travels over REST
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::DependencyUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::DependencyUnavailable => "Dependency unavailable",
            Self::Internal => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            422 => Ok(Self::ValidationFailed),
            404 => Ok(Self::NotFound),
            409 => Ok(Self::Conflict),
            503 => Ok(Self::DependencyUnavailable),
            500 => Ok(Self::Internal),
            other => Err(format!("unknown error code: {other}")),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trips_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::Conflict,
            ErrorCode::DependencyUnavailable,
            ErrorCode::Internal,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn http_status_matches_numeric_value() {
        assert_eq!(
            ErrorCode::NotFound.http_status(),
            StatusCode::from_u16(ErrorCode::NotFound.code()).unwrap()
        );
        assert_eq!(
            ErrorCode::Conflict.http_status(),
            StatusCode::from_u16(ErrorCode::Conflict.code()).unwrap()
        );
    }
}
