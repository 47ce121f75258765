//! Error types
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Validation Error ==
/// Why a candidate asset URL failed its reachability check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The check did not finish before its deadline
    #[error("Validation timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, TLS or connection failure
    #[error("Network error: {0}")]
    Network(String),

    /// The host answered with a non-2xx status
    #[error("Unexpected status {0}")]
    Status(u16),

    /// The URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ValidationError {
    /// Short class name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Timeout(_) => "timeout",
            ValidationError::Network(_) => "network",
            ValidationError::Status(_) => "status",
            ValidationError::InvalidUrl(_) => "invalid-url",
        }
    }
}

// == Fetch Error ==
/// Failure of a JSON fetch made by the API client.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("Request to {endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Request to {endpoint} timed out after {after_ms}ms")]
    Timeout { endpoint: String, after_ms: u64 },

    #[error("Invalid JSON from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

// == Upstream Error ==
/// Failure talking to the upstream sports-data API.
#[derive(Error, Debug, Clone)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Request(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Upstream reported errors: {0}")]
    Api(String),

    #[error("Malformed upstream response: {0}")]
    Decode(String),
}

// == Store Error ==
/// Failure of the persisted fixture cache.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Fixture store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid fixture record: {0}")]
    InvalidRecord(String),
}

// == App Error ==
/// Error type returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Nothing to serve for the requested resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream failed and nothing was cached
    #[error("Failed to fetch data from upstream")]
    Upstream(#[from] UpstreamError),

    /// The fixture store failed on a read
    #[error("Fixture cache unavailable")]
    Storage(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Upstream(e) => Some(e.to_string()),
            AppError::Storage(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP layer.
pub type Result<T> = std::result::Result<T, AppError>;
