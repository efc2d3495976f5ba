//! Workflow pre-flight refusals

/// Result type
pub type Result<T> = std::result::Result<T, StartRefusal>;

/// Why scanning could not start.
///
/// The controller stays `Idle` and surfaces one of these instead of
/// transitioning; none of them are retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartRefusal {
    /// No network reachability
    #[error("Internet connection required")]
    Offline,

    /// Device has no camera
    #[error("No camera available on this device")]
    NoCamera,

    /// Camera permission is in a denied state
    #[error("Camera permission was denied")]
    PermissionDenied,

    /// Calling origin lacks required transport security
    #[error("A secure (HTTPS) context is required")]
    InsecureContext,

    /// Camera failed for another reason
    #[error("Camera error: {0}")]
    Camera(String),

    /// A scan or check-in is already in progress
    #[error("A scan is already in progress")]
    AlreadyActive,

    /// A previous result must be dismissed first
    #[error("Previous result must be dismissed first")]
    AwaitingReset,
}
