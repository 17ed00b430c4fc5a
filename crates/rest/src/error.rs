//! Error types for the rates API.
//!
//! All errors surface to clients as a JSON body of the shape
//! `{ "error": { "code": ..., "message": ... } }` with an appropriate
//! HTTP status code.
//!
//! # Error Mapping
//!
//! Storage errors from the store crate are mapped automatically:
//!
//! | Storage Error | HTTP Status | Code |
//! |---------------|-------------|------|
//! | Query (bad sort field, ...) | 400 | invalid |
//! | Backend (pool, SQLite, corrupt row) | 500 | internal |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calc_store::error::{QueryError, StorageError};
use thiserror::Error;
use tracing::error;

/// The primary error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request parameter failed to parse or validate (HTTP 400).
    #[error("bad request: {message}")]
    BadRequest {
        /// Human-readable description of the problem.
        message: String,
    },

    /// A store or serialization failure (HTTP 500). The message is logged
    /// but never sent to the client.
    #[error("internal error: {message}")]
    Internal {
        /// Internal diagnostic message.
        message: String,
    },

    /// The storage backend is unreachable (HTTP 503).
    #[error("service unavailable: {message}")]
    Unavailable {
        /// Internal diagnostic message.
        message: String,
    },
}

impl ApiError {
    /// Convenience constructor for parameter validation failures.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    /// Convenience constructor for a parameter that failed to parse as a
    /// number.
    pub fn invalid_number(param: &str, value: &str) -> Self {
        ApiError::BadRequest {
            message: format!("parameter '{}' is not a valid number: '{}'", param, value),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "invalid", message.clone())
            }
            ApiError::Internal { message } => {
                error!("internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "internal server error".to_string(),
                )
            }
            ApiError::Unavailable { message } => {
                error!("storage unavailable: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    "service unavailable".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            // Query description errors are the client's fault.
            StorageError::Query(e) => match e {
                QueryError::UnknownSortField { .. } => ApiError::BadRequest {
                    message: e.to_string(),
                },
            },
            StorageError::Backend(e) => ApiError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest {
            message: err.to_string(),
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_display() {
        let err = ApiError::bad_request("parameter 'price' is not a valid number: 'abc'");
        assert!(err.to_string().contains("price"));
        assert!(err.to_string().starts_with("bad request"));
    }

    #[test]
    fn unknown_sort_field_maps_to_bad_request() {
        let storage = StorageError::Query(QueryError::UnknownSortField {
            name: "bogus".to_string(),
        });
        let api: ApiError = storage.into();
        assert!(matches!(api, ApiError::BadRequest { .. }));
    }

    #[test]
    fn backend_error_maps_to_internal() {
        use calc_store::error::BackendError;
        let storage = StorageError::Backend(BackendError::Sqlite {
            message: "disk I/O error".to_string(),
        });
        let api: ApiError = storage.into();
        assert!(matches!(api, ApiError::Internal { .. }));
    }
}
