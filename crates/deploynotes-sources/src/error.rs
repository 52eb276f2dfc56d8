//! Source error types

use thiserror::Error;

/// Errors raised by deployment and commit sources
#[derive(Debug, Error)]
pub enum SourceError {
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API error from the upstream service
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Timeout
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Git error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// Whether the error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::ApiError { status, .. } => *status == 404,
            Self::Git(e) => e.code() == git2::ErrorCode::NotFound,
            _ => false,
        }
    }

    /// Map a non-success HTTP status to an error
    pub(crate) fn from_status(status: reqwest::StatusCode, what: &str, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => Self::AuthenticationFailed(format!("{} ({})", what, status)),
            404 => Self::NotFound(what.to_string()),
            code => Self::ApiError {
                status: code,
                message,
            },
        }
    }
}

/// Result type for source operations
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        let err = SourceError::from_status(StatusCode::NOT_FOUND, "release Releases-1", String::new());
        assert!(err.is_not_found());

        let err = SourceError::from_status(StatusCode::UNAUTHORIZED, "spaces", String::new());
        assert!(matches!(err, SourceError::AuthenticationFailed(_)));

        let err = SourceError::from_status(StatusCode::BAD_GATEWAY, "spaces", "upstream".into());
        assert!(matches!(err, SourceError::ApiError { status: 502, .. }));
        assert!(!err.is_not_found());
    }
}
