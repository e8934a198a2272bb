//! Error types for the API server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures talking to the key-value store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Connection or read/write failure
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation exceeded the configured timeout
    #[error("Cache operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Unexpected reply from the cache server
    #[error("Cache protocol error: {0}")]
    Protocol(String),

    /// Stored value could not be (de)serialized
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No cache servers configured
    #[error("No cache servers configured")]
    NoServers,
}

// == Api Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request parameter
    #[error("{0}")]
    Validation(String),

    /// Credentials missing or rejected by the identity service
    #[error("Invalid username or password")]
    Unauthorized,

    /// Signature missing or not matching the request body
    #[error("Invalid or missing signature")]
    InvalidSignature,

    /// Key-value store failure
    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidSignature => StatusCode::FORBIDDEN,
            ApiError::Cache(err) => {
                tracing::error!("Cache failure: {}", err);
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
/// Convenience Result type for request handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
