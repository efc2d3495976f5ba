//! Capture session lifecycle
//!
//! `start()` arms a decode loop that inspects frames at a bounded rate
//! and fires at most once; `stop()` is idempotent and always releases
//! the camera.

use crate::camera::{Camera, CameraOptions, Decoder};
use crate::{CancelToken, Error, Result};
use gatepass_core::ScanPayload;
use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Single-fire receiver for the first decode of one `start()` call.
///
/// The decode loop stops itself immediately after sending, so one
/// physical code can never produce two notifications.
pub struct DecodeHandle {
    rx: oneshot::Receiver<ScanPayload>,
}

impl DecodeHandle {
    /// Await the first decoded payload.
    ///
    /// Resolves to [`Error::Closed`] if the session stops, or the frame
    /// stream ends, before any code is decoded.
    pub async fn decoded(self) -> Result<ScanPayload> {
        self.rx.await.map_err(|_| Error::Closed)
    }
}

/// Camera + decode loop lifecycle.
///
/// The camera handle is exclusively owned by the active loop and is
/// released when the loop exits, whether by decode, stop, or stream
/// end.
pub struct CaptureSession {
    camera: Arc<dyn Camera>,
    decoder: Arc<dyn Decoder>,
    options: CameraOptions,
    active: Arc<AtomicBool>,
    cancel: Mutex<Option<CancelToken>>,
}

impl CaptureSession {
    /// Create a session over the given camera and decoder
    pub fn new(camera: Arc<dyn Camera>, decoder: Arc<dyn Decoder>, options: CameraOptions) -> Self {
        Self {
            camera,
            decoder,
            options,
            active: Arc::new(AtomicBool::new(false)),
            cancel: Mutex::new(None),
        }
    }

    /// Whether any camera is present on this device
    pub async fn has_camera(&self) -> bool {
        self.camera.has_camera().await
    }

    /// Whether the decode loop is currently running
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Acquire the camera and arm the decode loop.
    ///
    /// Re-arms the session: any previous loop is cancelled first. The
    /// loop inspects frames at most `max_scans_per_second` times per
    /// second and stops itself after the first successful decode.
    pub async fn start(&self) -> Result<DecodeHandle> {
        self.stop();

        if !self.camera.has_camera().await {
            return Err(Error::NoDevice);
        }
        let mut source = self.camera.open(&self.options).await?;

        let cancel = CancelToken::new();
        *self.cancel.lock() = Some(cancel.clone());
        self.active.store(true, Ordering::Release);

        let (tx, rx) = oneshot::channel();
        let decoder = Arc::clone(&self.decoder);
        let active = Arc::clone(&self.active);
        let scan_period = Duration::from_millis(
            (1_000 / u64::from(self.options.max_scans_per_second.max(1))).max(1),
        );

        tokio::spawn(async move {
            let mut ticker = interval(scan_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("decode loop cancelled");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                let frame = tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("decode loop cancelled");
                        break;
                    }
                    frame = source.next_frame() => match frame {
                        Some(frame) => frame,
                        None => {
                            warn!("frame stream ended before a decode");
                            break;
                        }
                    },
                };

                // Decode misses are the steady state, not failures
                if let Some(payload) = decoder.decode(&frame) {
                    debug!("decoded payload, stopping loop");
                    let _ = tx.send(payload);
                    break;
                }
            }

            active.store(false, Ordering::Release);
            // Dropping the frame source releases the camera handle
        });

        Ok(DecodeHandle { rx })
    }

    /// Halt the decode loop and release the camera.
    ///
    /// Idempotent; calling on an already-stopped session is a no-op.
    pub fn stop(&self) {
        if let Some(cancel) = self.cancel.lock().take() {
            cancel.cancel();
        }
        self.active.store(false, Ordering::Release);
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}
