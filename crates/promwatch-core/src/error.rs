//! Shared error type across promwatch crates.

use thiserror::Error;

/// Stable error codes (safe to log or return to operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Histogram bucket list rejected.
    InvalidBuckets,
    /// Configuration file rejected.
    BadConfig,
    /// Internal failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test assertions.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidBuckets => "INVALID_BUCKETS",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Unified error type used by core and the axum integration.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Map error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MonitorError::InvalidBuckets(_) => ErrorCode::InvalidBuckets,
            MonitorError::BadConfig(_) => ErrorCode::BadConfig,
            MonitorError::Internal(_) => ErrorCode::Internal,
        }
    }
}
