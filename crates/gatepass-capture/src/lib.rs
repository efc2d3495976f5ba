//! Camera capture and QR decode session
//!
//! Owns the camera handle for its active lifetime and runs a
//! bounded-rate decode loop that fires at most once per start.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod camera;
pub mod cancel;
pub mod error;
pub mod session;

pub use camera::{Camera, CameraFacing, CameraOptions, Decoder, Frame, FrameSource};
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use session::{CaptureSession, DecodeHandle};
