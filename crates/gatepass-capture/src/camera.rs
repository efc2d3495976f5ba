//! Camera and decoder seams
//!
//! The camera device and the QR decoding algorithm are black boxes
//! behind these traits; the session only drives lifecycles.

use crate::Result;
use async_trait::async_trait;
use gatepass_core::ScanPayload;
use serde::{Deserialize, Serialize};

/// Which camera to prefer when several are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Rear (environment) camera
    #[default]
    #[serde(rename = "environment")]
    Environment,
    /// Front (user) camera
    #[serde(rename = "user")]
    User,
}

/// Capability flags passed through unchanged to the platform camera and
/// decoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraOptions {
    /// Preferred camera facing
    pub preferred_facing: CameraFacing,
    /// Ask the platform to highlight the active scan region
    pub highlight_scan_region: bool,
    /// Upper bound on decode attempts per second
    pub max_scans_per_second: u32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            preferred_facing: CameraFacing::Environment,
            highlight_scan_region: true,
            max_scans_per_second: 5,
        }
    }
}

/// One captured video frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data; layout is defined by the producing camera
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

/// Camera device abstraction
#[async_trait]
pub trait Camera: Send + Sync {
    /// Whether any camera is present on this device
    async fn has_camera(&self) -> bool;

    /// Acquire the camera and begin producing frames.
    ///
    /// Blocks on the platform permission prompt; a refusal maps to
    /// [`Error::PermissionDenied`](crate::Error::PermissionDenied).
    async fn open(&self, options: &CameraOptions) -> Result<Box<dyn FrameSource>>;
}

/// Live camera stream.
///
/// Dropping the source releases the underlying camera handle.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame, or `None` once the stream has ended
    async fn next_frame(&mut self) -> Option<Frame>;
}

/// Black-box QR decode capability
pub trait Decoder: Send + Sync {
    /// Try to decode a code from one frame.
    ///
    /// `None` means no code in view, the expected steady state.
    fn decode(&self, frame: &Frame) -> Option<ScanPayload>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CameraOptions::default();
        assert_eq!(options.preferred_facing, CameraFacing::Environment);
        assert!(options.highlight_scan_region);
        assert_eq!(options.max_scans_per_second, 5);
    }
}
