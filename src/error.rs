//! Error types for the cache and manager layers
//!
//! Provides unified error handling using thiserror.

use serde_json::Value;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by a cache store or its backend.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Backend connection is not established (still connecting, or setup failed)
    #[error("Cache not ready: {0}")]
    NotReady(String),

    /// Backend command failed
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Value could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Rest Error Enum ==
/// Errors raised by the remote transport.
#[derive(Error, Debug)]
pub enum RestError {
    /// Remote answered with a non-success status
    #[error("Remote request failed with status {status}")]
    Status { status: u16, body: Option<Value> },

    /// Request never produced a response (connect, timeout, decode)
    #[error("Transport error: {0}")]
    Transport(String),
}

impl RestError {
    /// Status code of the failed call, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            RestError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        RestError::Transport(err.to_string())
    }
}

// == Client Error Enum ==
/// Errors surfaced by managers.
///
/// Cache and transport failures pass through untouched; managers only add
/// usage errors for preconditions they check before calling out.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Rest(#[from] RestError),

    /// Caller-supplied arguments violate a precondition
    #[error("{0}")]
    Usage(String),

    /// A payload did not match the shape the manager expects
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ClientError {
    pub fn usage(message: impl Into<String>) -> Self {
        ClientError::Usage(message.into())
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type for remote transport calls.
pub type RestResult<T> = std::result::Result<T, RestError>;

/// Result type for manager operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;
