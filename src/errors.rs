//! Data manager error types
//!
//! Every failure the query path can raise is a variant here. Errors are
//! deterministic given their input and are never retried internally.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for data manager operations
pub type DmResult<T> = Result<T, DataManagerError>;

/// Data manager errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataManagerError {
    // ==================
    // Query Errors
    // ==================
    /// Filter clause targets something other than `tasks`
    #[error("Filtering target {0} is not yet supported")]
    UnsupportedFilterTarget(String),

    /// Tab conjunction is neither `and` nor `or`
    #[error("Filtering conjunction {0} is not supported")]
    UnsupportedConjunction(String),

    /// Operator outside the fixed operator set
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),

    /// Filter key is not of the form `<namespace>:<target>:<field>`
    #[error("Invalid filter key: {0}")]
    InvalidFilterKey(String),

    /// Operand does not fit the operator (e.g. range without min/max)
    #[error("Invalid value for operator {operator}: {reason}")]
    InvalidFilterValue { operator: String, reason: String },

    // ==================
    // Tab Errors
    // ==================
    /// Tab required to exist but absent
    #[error("No tab with id: {0}")]
    TabNotFound(i64),

    // ==================
    // Collaborator Errors
    // ==================
    /// Task store failure
    #[error("Task storage error: {0}")]
    Storage(String),

    /// URI resolution failure
    #[error("URI resolution failed: {0}")]
    UriResolution(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataManagerError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DataManagerError::UnsupportedFilterTarget(_) => "DM_UNSUPPORTED_FILTER_TARGET",
            DataManagerError::UnsupportedConjunction(_) => "DM_UNSUPPORTED_CONJUNCTION",
            DataManagerError::UnknownOperator(_) => "DM_UNKNOWN_OPERATOR",
            DataManagerError::InvalidFilterKey(_) => "DM_INVALID_FILTER_KEY",
            DataManagerError::InvalidFilterValue { .. } => "DM_INVALID_FILTER_VALUE",
            DataManagerError::TabNotFound(_) => "DM_TAB_NOT_FOUND",
            DataManagerError::Storage(_) => "DM_STORAGE_FAILED",
            DataManagerError::UriResolution(_) => "DM_URI_RESOLUTION_FAILED",
            DataManagerError::Config(_) => "DM_CONFIG_ERROR",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            DataManagerError::UnsupportedFilterTarget(_)
            | DataManagerError::UnsupportedConjunction(_)
            | DataManagerError::UnknownOperator(_)
            | DataManagerError::InvalidFilterKey(_)
            | DataManagerError::InvalidFilterValue { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found
            DataManagerError::TabNotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            DataManagerError::Storage(_)
            | DataManagerError::UriResolution(_)
            | DataManagerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true when the error comes from the request itself
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<&DataManagerError> for ErrorResponse {
    fn from(err: &DataManagerError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
        }
    }
}

impl IntoResponse for DataManagerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DataManagerError::UnsupportedFilterTarget("annotations".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DataManagerError::TabNotFound(7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DataManagerError::Storage("disk".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        let err = DataManagerError::UnsupportedFilterTarget("annotations".to_string());
        assert_eq!(
            err.to_string(),
            "Filtering target annotations is not yet supported"
        );
        assert_eq!(err.code(), "DM_UNSUPPORTED_FILTER_TARGET");

        let err = DataManagerError::TabNotFound(3);
        assert_eq!(err.to_string(), "No tab with id: 3");
    }

    #[test]
    fn test_client_errors() {
        assert!(DataManagerError::UnknownOperator("like".to_string()).is_client_error());
        assert!(!DataManagerError::UriResolution("timeout".to_string()).is_client_error());
    }
}
