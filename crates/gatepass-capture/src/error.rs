//! Error types for camera capture

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Camera capture errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No camera on this device
    #[error("No camera available on this device")]
    NoDevice,

    /// Camera permission was refused
    #[error("Camera permission was denied")]
    PermissionDenied,

    /// Calling origin lacks required transport security
    #[error("A secure (HTTPS) context is required for camera access")]
    InsecureContext,

    /// Session ended before a code was decoded
    #[error("Capture session closed before a code was decoded")]
    Closed,

    /// Anything else the platform reports
    #[error("Camera error: {0}")]
    Unknown(String),
}
