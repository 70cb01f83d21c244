//! Error types for the housekeeping subsystem
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Housekeeping Error Enum ==
/// Unified error type for the housekeeping subsystem.
#[derive(Error, Debug)]
pub enum HousekeepingError {
    /// The durable store rejected or failed a query
    #[error("Store error: {0}")]
    Store(String),

    /// A requested record or session does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Data that must exist is missing; indicates upstream corruption
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// The scheduler's task set was already populated
    #[error("Housekeeping tasks already initialized")]
    AlreadyInitialized,

    /// Two housekeeping duties were registered under the same name
    #[error("Duplicate housekeeping task: {0}")]
    DuplicateTask(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HousekeepingError {
    /// Returns true if the owning task must stop instead of waiting for the next tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HousekeepingError::InvariantViolation(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for HousekeepingError {
    fn into_response(self) -> Response {
        let status = match &self {
            HousekeepingError::NotFound(_) => StatusCode::NOT_FOUND,
            HousekeepingError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            HousekeepingError::AlreadyInitialized | HousekeepingError::DuplicateTask(_) => {
                StatusCode::CONFLICT
            }
            HousekeepingError::InvariantViolation(_) | HousekeepingError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the housekeeping subsystem.
pub type Result<T> = std::result::Result<T, HousekeepingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invariant_violation_is_fatal() {
        assert!(HousekeepingError::InvariantViolation("user 3".into()).is_fatal());
        assert!(!HousekeepingError::Store("timeout".into()).is_fatal());
        assert!(!HousekeepingError::NotFound("user 3".into()).is_fatal());
        assert!(!HousekeepingError::AlreadyInitialized.is_fatal());
    }

    #[test]
    fn test_error_status_codes() {
        let response = HousekeepingError::NotFound("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = HousekeepingError::Store("down".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = HousekeepingError::AlreadyInitialized.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
