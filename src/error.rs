//! Error types for context assembly and progress distribution.

use thiserror::Error;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store request failed: {0}")]
    RequestFailed(String),

    #[error("Store authentication failed: {0}")]
    AuthFailed(String),

    #[error("Invalid store response: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced to callers of the assembly path
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Context assembly failed for {correlation_id}: {source}")]
    AssemblyFailed {
        correlation_id: String,
        #[source]
        source: StoreError,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// A write to one subscriber's sink failed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Sink closed")]
    Closed,
}

/// An event type outside the progress event catalog
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown event type: {0}")]
pub struct UnknownEventType(pub String);
