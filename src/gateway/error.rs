//! Gateway error types
//!
//! Every failure of a round trip lands in one of two buckets: the request
//! never produced a usable response, or the service answered and said no.

use thiserror::Error;

/// Errors surfaced by [`ApiGateway::execute`](super::ApiGateway::execute)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network failure or a body that could not be decoded
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service reported the operation as failed
    #[error("Application error: {0}")]
    Application(String),
}

impl ApiError {
    /// The bare message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport(msg) | ApiError::Application(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Transport(format!("Parse error: {}", err))
    }
}

/// Result type alias for gateway operations
pub type ApiResult<T> = Result<T, ApiError>;
