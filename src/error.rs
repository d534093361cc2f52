//! Error types for the dashboard binders
//!
//! Every failure a card can see is a [`FetchError`]. The binder converts it to
//! a `Failed` view state at the fetch boundary, so none of these reach the
//! rendering layer as a fault.

use std::time::Duration;

use thiserror::Error;

/// Result alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure of a single request against the backend proxy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Upstream returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Upstream reported failure: {0}")]
    Rejected(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid request '{path}': {reason}")]
    InvalidRequest { path: String, reason: String },
}

/// Coarse taxonomy used for retry decisions and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Transport failure or timeout
    Network,
    /// Non-2xx status, `success: false`, or an unusable body
    Upstream,
}

impl FetchError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => ErrorClass::Network,
            FetchError::Status { .. }
            | FetchError::Rejected(_)
            | FetchError::Decode(_)
            | FetchError::InvalidRequest { .. } => ErrorClass::Upstream,
        }
    }

    /// Transport failures and 5xx responses may succeed on a second try.
    /// A timeout already spent the whole request budget and is final, so a
    /// hanging proxy fails after one timeout period.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::Timeout(_)
            | FetchError::Rejected(_)
            | FetchError::Decode(_)
            | FetchError::InvalidRequest { .. } => false,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        FetchError::Decode(error.to_string())
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid value for {var}: '{value}'")]
    InvalidNumber { var: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(FetchError::Network("reset".into()).class(), ErrorClass::Network);
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(30)).class(),
            ErrorClass::Network
        );
        assert_eq!(
            FetchError::Status {
                status: 404,
                detail: "not found".into()
            }
            .class(),
            ErrorClass::Upstream
        );
        assert_eq!(FetchError::Rejected("nope".into()).class(), ErrorClass::Upstream);
    }

    #[test]
    fn test_retryable() {
        assert!(FetchError::Network("reset".into()).is_retryable());
        assert!(!FetchError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(FetchError::Status {
            status: 503,
            detail: String::new()
        }
        .is_retryable());
        assert!(!FetchError::Status {
            status: 404,
            detail: String::new()
        }
        .is_retryable());
        assert!(!FetchError::Rejected("CEP not found".into()).is_retryable());
        assert!(!FetchError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(30)).to_string(),
            "Request timed out after 30s"
        );
    }
}
