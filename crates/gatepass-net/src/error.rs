//! Error types for submission transport

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Submission errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Connection-level failure (refused, DNS, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Response body was not the expected structured form
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Request was cancelled or timed out
    #[error("Request timed out")]
    Timeout,
}
