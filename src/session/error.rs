//! Session error types

use thiserror::Error;

use crate::gateway::ApiError;

/// Errors returned by controller operations
///
/// None of these are fatal: the session is left as it was and the view
/// stays where it is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiaryError {
    /// A client-side precondition failed; no request was sent
    #[error("{0}")]
    LocalValidation(String),

    /// Network or decoding failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service rejected the operation
    #[error("{0}")]
    Application(String),
}

impl From<ApiError> for DiaryError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(msg) => DiaryError::Transport(msg),
            ApiError::Application(msg) => DiaryError::Application(msg),
        }
    }
}

/// Result type alias for controller operations
pub type DiaryResult<T> = Result<T, DiaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_conversion() {
        let err: DiaryError = ApiError::Application("Invalid secret phrase".to_string()).into();
        assert_eq!(err, DiaryError::Application("Invalid secret phrase".to_string()));

        let err: DiaryError = ApiError::Transport("refused".to_string()).into();
        assert_eq!(err.to_string(), "Transport error: refused");
    }
}
