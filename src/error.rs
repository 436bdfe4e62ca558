//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.
//!
//! Cache misses and ring lookups never produce errors; they return `Option`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for groups, the registry and the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No group registered under this name
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A group or registry was set up incorrectly
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The loader could not produce a value
    #[error("failed to load key '{key}': {source}")]
    Load {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Load { .. } => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
