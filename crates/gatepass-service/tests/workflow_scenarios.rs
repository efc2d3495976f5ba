//! End-to-end workflow scenarios
//!
//! Drives the controller with a scripted camera and a counting
//! submission client; no network, no real camera.

use async_trait::async_trait;
use gatepass_capture::{Camera, CameraOptions, Decoder, Error as CaptureError, Frame, FrameSource};
use gatepass_core::{CheckInOutcome, FailureReason, ScanPayload, SessionState};
use gatepass_net::{CheckInAck, CheckInSubmission, ConnectivityMonitor, Error as SubmissionError};
use gatepass_service::{CheckInController, PermissionState, ServiceConfig, StartRefusal};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Camera that serves every frame with the same bytes
struct ScriptedCamera {
    present: bool,
    open_error: Option<CaptureError>,
    frame_data: Vec<u8>,
    open_calls: Arc<AtomicUsize>,
}

impl ScriptedCamera {
    fn serving(frame_data: &[u8]) -> Self {
        Self {
            present: true,
            open_error: None,
            frame_data: frame_data.to_vec(),
            open_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn denied() -> Self {
        Self {
            open_error: Some(CaptureError::PermissionDenied),
            ..Self::serving(&[])
        }
    }

    fn absent() -> Self {
        Self {
            present: false,
            ..Self::serving(&[])
        }
    }
}

#[async_trait]
impl Camera for ScriptedCamera {
    async fn has_camera(&self) -> bool {
        self.present
    }

    async fn open(
        &self,
        _options: &CameraOptions,
    ) -> gatepass_capture::Result<Box<dyn FrameSource>> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.open_error.clone() {
            return Err(error);
        }
        Ok(Box::new(ScriptedSource {
            frame_data: self.frame_data.clone(),
        }))
    }
}

struct ScriptedSource {
    frame_data: Vec<u8>,
}

#[async_trait]
impl FrameSource for ScriptedSource {
    async fn next_frame(&mut self) -> Option<Frame> {
        Some(Frame {
            data: self.frame_data.clone(),
            width: 640,
            height: 480,
        })
    }
}

/// Decoder that reads frame bytes as UTF-8; empty frames decode to
/// nothing
struct PassthroughDecoder;

impl Decoder for PassthroughDecoder {
    fn decode(&self, frame: &Frame) -> Option<ScanPayload> {
        if frame.data.is_empty() {
            return None;
        }
        Some(ScanPayload::new(String::from_utf8_lossy(&frame.data)))
    }
}

/// Submission client that counts calls and replays a scripted result
struct CountingSubmitter {
    calls: Arc<AtomicUsize>,
    response: Result<CheckInAck, SubmissionError>,
}

impl CountingSubmitter {
    fn ok() -> Self {
        // Models HTTP 200 with body `{}`
        Self::with_response(Ok(CheckInAck {
            message: "QR check-in complete.".to_string(),
            echoed: None,
        }))
    }

    fn with_response(response: Result<CheckInAck, SubmissionError>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            response,
        }
    }
}

#[async_trait]
impl gatepass_net::SubmissionClient for CountingSubmitter {
    async fn submit(
        &self,
        _submission: &CheckInSubmission,
    ) -> gatepass_net::Result<CheckInAck> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

struct Harness {
    controller: CheckInController,
    connectivity: ConnectivityMonitor,
    submit_calls: Arc<AtomicUsize>,
    open_calls: Arc<AtomicUsize>,
}

fn harness(camera: ScriptedCamera, submitter: CountingSubmitter, online: bool) -> Harness {
    let connectivity = ConnectivityMonitor::new(online);
    let submit_calls = Arc::clone(&submitter.calls);
    let open_calls = Arc::clone(&camera.open_calls);
    let controller = CheckInController::new(
        Arc::new(camera),
        Arc::new(PassthroughDecoder),
        Arc::new(submitter),
        connectivity.clone(),
        &ServiceConfig::default(),
    );
    Harness {
        controller,
        connectivity,
        submit_calls,
        open_calls,
    }
}

#[tokio::test(start_paused = true)]
async fn scenario_a_happy_path() {
    let h = harness(
        ScriptedCamera::serving(b"ABC123"),
        CountingSubmitter::ok(),
        true,
    );

    h.controller.start().await.unwrap();
    assert_eq!(h.controller.state(), SessionState::Scanning);

    let outcome = h.controller.await_outcome().await.unwrap();
    match &outcome {
        CheckInOutcome::Success {
            message,
            echoed_payload,
            ..
        } => {
            assert_eq!(echoed_payload.as_str(), "ABC123");
            assert!(!message.is_empty());
        }
        other => panic!("expected success, got {:?}", other),
    }

    assert_eq!(h.controller.state(), SessionState::Resulted(outcome));
    assert_eq!(h.submit_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn scenario_b_offline_at_decode_never_submits() {
    let h = harness(
        ScriptedCamera::serving(b"ABC123"),
        CountingSubmitter::ok(),
        true,
    );

    h.controller.start().await.unwrap();
    h.connectivity.set_online(false);

    let outcome = h.controller.await_outcome().await.unwrap();
    assert_eq!(
        outcome,
        CheckInOutcome::Failure {
            reason: FailureReason::Offline,
            detail: None,
        }
    );
    assert_eq!(h.submit_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scenario_c_permission_denied_latches() {
    let h = harness(ScriptedCamera::denied(), CountingSubmitter::ok(), true);

    assert_eq!(
        h.controller.start().await,
        Err(StartRefusal::PermissionDenied)
    );
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert_eq!(h.open_calls.load(Ordering::SeqCst), 1);

    // Denial is latched: the camera is not prompted again
    assert_eq!(
        h.controller.start().await,
        Err(StartRefusal::PermissionDenied)
    );
    assert_eq!(h.open_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.controller.status().await.permission,
        PermissionState::Denied
    );
}

#[tokio::test(start_paused = true)]
async fn scenario_d_http_500_maps_to_failure() {
    let h = harness(
        ScriptedCamera::serving(b"ABC123"),
        CountingSubmitter::with_response(Err(SubmissionError::Http(500))),
        true,
    );

    h.controller.start().await.unwrap();
    let outcome = h.controller.await_outcome().await.unwrap();

    match outcome {
        CheckInOutcome::Failure { reason, detail } => {
            assert_eq!(reason, FailureReason::Http(500));
            assert!(detail.is_some());
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn one_code_yields_one_submission() {
    // The scripted camera would happily serve decodable frames forever;
    // the single-fire handle still produces exactly one submission.
    let h = harness(
        ScriptedCamera::serving(b"REPEATED"),
        CountingSubmitter::ok(),
        true,
    );

    h.controller.start().await.unwrap();
    let outcome = h.controller.await_outcome().await.unwrap();
    assert!(outcome.is_success());

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    assert_eq!(h.submit_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn start_refused_when_offline() {
    let h = harness(
        ScriptedCamera::serving(b"ABC123"),
        CountingSubmitter::ok(),
        false,
    );

    assert_eq!(h.controller.start().await, Err(StartRefusal::Offline));
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert_eq!(h.submit_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn start_refused_without_camera() {
    let h = harness(ScriptedCamera::absent(), CountingSubmitter::ok(), true);

    assert_eq!(h.controller.start().await, Err(StartRefusal::NoCamera));
    assert_eq!(h.controller.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn start_refused_while_scanning() {
    let h = harness(ScriptedCamera::serving(&[]), CountingSubmitter::ok(), true);

    h.controller.start().await.unwrap();
    assert_eq!(
        h.controller.start().await,
        Err(StartRefusal::AlreadyActive)
    );
    h.controller.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_yields_no_outcome() {
    // Frames never decode, so the session idles in Scanning until
    // stopped
    let h = harness(ScriptedCamera::serving(&[]), CountingSubmitter::ok(), true);

    h.controller.start().await.unwrap();
    h.controller.stop();
    h.controller.stop();

    assert_eq!(h.controller.state(), SessionState::Idle);
    assert_eq!(h.controller.await_outcome().await, None);
    assert_eq!(h.submit_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn reset_dismisses_result_and_rearms() {
    let h = harness(
        ScriptedCamera::serving(b"FIRST"),
        CountingSubmitter::ok(),
        true,
    );

    h.controller.start().await.unwrap();
    let outcome = h.controller.await_outcome().await.unwrap();
    assert!(outcome.is_success());

    // A terminal outcome blocks start until it is dismissed
    assert_eq!(
        h.controller.start().await,
        Err(StartRefusal::AwaitingReset)
    );

    h.controller.reset().await.unwrap();
    assert_eq!(h.controller.state(), SessionState::Scanning);

    let second = h.controller.await_outcome().await.unwrap();
    assert!(second.is_success());
    assert_eq!(h.submit_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn state_transitions_are_observable() {
    let h = harness(
        ScriptedCamera::serving(b"ABC123"),
        CountingSubmitter::ok(),
        true,
    );
    let watch = h.controller.watch_state();
    assert_eq!(*watch.borrow(), SessionState::Idle);

    h.controller.start().await.unwrap();
    assert_eq!(*watch.borrow(), SessionState::Scanning);

    let outcome = h.controller.await_outcome().await.unwrap();
    assert_eq!(*watch.borrow(), SessionState::Resulted(outcome));
}
