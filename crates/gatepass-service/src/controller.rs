//! Scan-to-checkin workflow controller
//!
//! Owns the four-state session machine. Decode and submission are made
//! mutually exclusive by sequencing: capture is stopped before any
//! processing begins. Every terminal outcome requires an explicit user
//! reset; nothing is retried automatically.

use crate::config::ServiceConfig;
use crate::error::{Result, StartRefusal};
use crate::status::{DeviceClass, PermissionState, StatusSnapshot};
use chrono::Utc;
use gatepass_capture::{
    Camera, CaptureSession, DecodeHandle, Decoder, Error as CaptureError,
};
use gatepass_core::{CheckInCipher, CheckInOutcome, FailureReason, ScanPayload, SessionState};
use gatepass_net::{
    CheckInSubmission, ConnectivityMonitor, Error as SubmissionError, HttpSubmissionClient,
    SimulatedSubmissionClient, SubmissionClient,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Workflow controller
pub struct CheckInController {
    capture: CaptureSession,
    cipher: CheckInCipher,
    submitter: Arc<dyn SubmissionClient>,
    connectivity: ConnectivityMonitor,
    state_tx: watch::Sender<SessionState>,
    permission: RwLock<PermissionState>,
    pending: Mutex<Option<DecodeHandle>>,
}

impl CheckInController {
    /// Controller over explicit collaborators
    pub fn new(
        camera: Arc<dyn Camera>,
        decoder: Arc<dyn Decoder>,
        submitter: Arc<dyn SubmissionClient>,
        connectivity: ConnectivityMonitor,
        config: &ServiceConfig,
    ) -> Self {
        let (state_tx, _rx) = watch::channel(SessionState::Idle);
        Self {
            capture: CaptureSession::new(camera, decoder, config.camera.clone()),
            cipher: CheckInCipher::fixed(),
            submitter,
            connectivity,
            state_tx,
            permission: RwLock::new(PermissionState::Unknown),
            pending: Mutex::new(None),
        }
    }

    /// Controller with the submission client chosen by configuration.
    ///
    /// `simulate` swaps in the simulated client at composition time;
    /// the HTTP client itself carries no simulation switch.
    pub fn with_config(
        camera: Arc<dyn Camera>,
        decoder: Arc<dyn Decoder>,
        connectivity: ConnectivityMonitor,
        config: &ServiceConfig,
    ) -> Self {
        let submitter: Arc<dyn SubmissionClient> = if config.simulate {
            Arc::new(SimulatedSubmissionClient::new())
        } else {
            Arc::new(HttpSubmissionClient::new(config.endpoint.clone()))
        };
        Self::new(camera, decoder, submitter, connectivity, config)
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Watch state transitions
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Snapshot for the rendering layer's status bar
    pub async fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state(),
            device: DeviceClass::detect(),
            has_camera: self.capture.has_camera().await,
            permission: *self.permission.read(),
            online: self.connectivity.is_online(),
        }
    }

    /// Begin scanning (`Idle` → `Scanning`).
    ///
    /// Pre-flight checks run first; on refusal the session stays `Idle`
    /// and the reason is returned for display. A permission denial
    /// latches: later starts refuse without touching the camera again.
    pub async fn start(&self) -> Result<()> {
        match self.state() {
            SessionState::Idle => {}
            SessionState::Resulted(_) => return Err(StartRefusal::AwaitingReset),
            _ => return Err(StartRefusal::AlreadyActive),
        }

        if !self.connectivity.is_online() {
            info!("start refused: offline");
            return Err(StartRefusal::Offline);
        }
        if !self.capture.has_camera().await {
            info!("start refused: no camera");
            return Err(StartRefusal::NoCamera);
        }
        if *self.permission.read() == PermissionState::Denied {
            info!("start refused: camera permission previously denied");
            return Err(StartRefusal::PermissionDenied);
        }

        let handle = match self.capture.start().await {
            Ok(handle) => handle,
            Err(error) => return Err(self.refuse_camera(error)),
        };

        *self.permission.write() = PermissionState::Granted;
        *self.pending.lock() = Some(handle);
        self.set_state(SessionState::Scanning);
        info!("scanning started");
        Ok(())
    }

    /// Drive the armed scan to its terminal outcome.
    ///
    /// Resolves after decode → encrypt → submit and returns the
    /// outcome, or `None` if no scan was armed or the user stopped it
    /// first.
    pub async fn await_outcome(&self) -> Option<CheckInOutcome> {
        let handle = self.pending.lock().take()?;

        let payload = match handle.decoded().await {
            Ok(payload) => payload,
            Err(_) => {
                // stop() already moved the state if the user cancelled
                if self.state() == SessionState::Scanning {
                    warn!("capture closed before a decode");
                    let outcome = CheckInOutcome::Failure {
                        reason: FailureReason::CaptureClosed,
                        detail: None,
                    };
                    self.set_state(SessionState::Resulted(outcome.clone()));
                    return Some(outcome);
                }
                return None;
            }
        };

        // Mutual exclusion: halt capture before any processing
        self.capture.stop();
        self.set_state(SessionState::Processing);
        info!("payload decoded, processing check-in");

        let outcome = self.process(payload).await;
        self.set_state(SessionState::Resulted(outcome.clone()));
        Some(outcome)
    }

    /// Stop scanning without an outcome (`Scanning` → `Idle`).
    ///
    /// Idempotent. Cancels frame scanning only; an in-flight submission
    /// is not cancellable.
    pub fn stop(&self) {
        self.capture.stop();
        if self.state() == SessionState::Scanning {
            self.set_state(SessionState::Idle);
            info!("scanning stopped");
        }
    }

    /// Dismiss a terminal outcome and re-arm scanning
    /// (`Resulted` → `Idle` → `Scanning`).
    pub async fn reset(&self) -> Result<()> {
        if self.state().is_terminal() {
            self.set_state(SessionState::Idle);
            debug!("result dismissed");
        }
        self.start().await
    }

    async fn process(&self, payload: ScanPayload) -> CheckInOutcome {
        if !self.connectivity.is_online() {
            warn!("connectivity lost before submission");
            return CheckInOutcome::Failure {
                reason: FailureReason::Offline,
                detail: None,
            };
        }

        let ciphertext = match self.cipher.encrypt(payload.as_str()) {
            Ok(ciphertext) => ciphertext,
            Err(error) => {
                warn!("encryption failed: {}", error);
                return CheckInOutcome::Failure {
                    reason: FailureReason::Encryption,
                    detail: Some(error.to_string()),
                };
            }
        };

        let submission = CheckInSubmission::new(ciphertext);
        match self.submitter.submit(&submission).await {
            Ok(ack) => {
                info!("check-in accepted");
                CheckInOutcome::Success {
                    message: ack.message,
                    completed_at: Utc::now(),
                    echoed_payload: payload,
                }
            }
            Err(error) => {
                warn!("submission failed: {}", error);
                CheckInOutcome::Failure {
                    reason: failure_reason(&error),
                    detail: Some(error.to_string()),
                }
            }
        }
    }

    fn refuse_camera(&self, error: CaptureError) -> StartRefusal {
        match error {
            CaptureError::NoDevice => StartRefusal::NoCamera,
            CaptureError::PermissionDenied => {
                *self.permission.write() = PermissionState::Denied;
                StartRefusal::PermissionDenied
            }
            CaptureError::InsecureContext => StartRefusal::InsecureContext,
            CaptureError::Closed | CaptureError::Unknown(_) => {
                StartRefusal::Camera(error.to_string())
            }
        }
    }

    fn set_state(&self, next: SessionState) {
        debug!("session state -> {}", next.name());
        self.state_tx.send_replace(next);
    }
}

fn failure_reason(error: &SubmissionError) -> FailureReason {
    match error {
        SubmissionError::Network(_) => FailureReason::Network,
        SubmissionError::Http(status) => FailureReason::Http(*status),
        SubmissionError::MalformedResponse(_) => FailureReason::MalformedResponse,
        SubmissionError::Timeout => FailureReason::Timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_mapping() {
        assert_eq!(
            failure_reason(&SubmissionError::Network("refused".into())),
            FailureReason::Network
        );
        assert_eq!(
            failure_reason(&SubmissionError::Http(500)),
            FailureReason::Http(500)
        );
        assert_eq!(
            failure_reason(&SubmissionError::MalformedResponse("eof".into())),
            FailureReason::MalformedResponse
        );
        assert_eq!(
            failure_reason(&SubmissionError::Timeout),
            FailureReason::Timeout
        );
    }
}
