//! CLI harness for exercising the check-in workflow
//!
//! This tool allows testing:
//! - The full scan → encrypt → submit flow with a synthetic camera
//! - One-shot submissions against a real endpoint
//! - Cipher round-trips

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use gatepass_capture::{Camera, CameraOptions, Decoder, Frame, FrameSource};
use gatepass_core::{CheckInCipher, CheckInOutcome, ScanPayload};
use gatepass_net::{
    CheckInSubmission, ConnectivityMonitor, HttpSubmissionClient, SubmissionClient,
    DEFAULT_ENDPOINT_URL,
};
use gatepass_service::{CheckInController, ServiceConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "checkin-harness")]
#[command(about = "Gatepass check-in testing harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full workflow with a synthetic camera and the simulated
    /// submission client
    Simulate {
        /// Payload the synthetic QR code decodes to
        #[arg(short, long, default_value = "GATE-DEMO-0001")]
        payload: String,

        /// Frames served before the code comes into view
        #[arg(short, long, default_value = "10")]
        misses: u32,
    },

    /// Encrypt a payload and submit it once over HTTP
    Submit {
        /// Payload to encrypt and submit
        payload: String,

        /// Check-in endpoint
        #[arg(short, long, default_value = DEFAULT_ENDPOINT_URL)]
        endpoint: String,
    },

    /// Encrypt then decrypt a string and verify the round-trip
    Roundtrip {
        /// Text to round-trip through the cipher
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { payload, misses } => run_simulate(payload, misses).await?,
        Commands::Submit { payload, endpoint } => run_submit(payload, endpoint).await?,
        Commands::Roundtrip { text } => run_roundtrip(text)?,
    }

    Ok(())
}

/// Camera that serves empty frames until the scripted code "comes into
/// view"
struct SyntheticCamera {
    payload: String,
    misses: u32,
}

#[async_trait]
impl Camera for SyntheticCamera {
    async fn has_camera(&self) -> bool {
        true
    }

    async fn open(
        &self,
        _options: &CameraOptions,
    ) -> gatepass_capture::Result<Box<dyn FrameSource>> {
        Ok(Box::new(SyntheticSource {
            payload: self.payload.clone(),
            misses_left: self.misses,
        }))
    }
}

struct SyntheticSource {
    payload: String,
    misses_left: u32,
}

#[async_trait]
impl FrameSource for SyntheticSource {
    async fn next_frame(&mut self) -> Option<Frame> {
        let data = if self.misses_left > 0 {
            self.misses_left -= 1;
            Vec::new()
        } else {
            self.payload.clone().into_bytes()
        };
        Some(Frame {
            data,
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

async fn run_simulate(payload: String, misses: u32) -> anyhow::Result<()> {
    info!("simulating check-in for payload {:?}", payload);

    let config = ServiceConfig {
        simulate: true,
        ..Default::default()
    };
    let controller = CheckInController::with_config(
        Arc::new(SyntheticCamera { payload, misses }),
        Arc::new(PassthroughDecoder),
        ConnectivityMonitor::new(true),
        &config,
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("scanning...");

    controller.start().await.context("could not start scanning")?;

    let outcome = controller
        .await_outcome()
        .await
        .context("scan stopped before a decode")?;
    spinner.finish_and_clear();

    print_outcome(&outcome);
    println!("status: {}", controller.status().await.summary());
    Ok(())
}

async fn run_submit(payload: String, endpoint: String) -> anyhow::Result<()> {
    info!("submitting one check-in to {}", endpoint);

    let ciphertext = CheckInCipher::fixed()
        .encrypt(&payload)
        .context("encryption failed")?;

    let client = HttpSubmissionClient::new(endpoint);
    let ack = client
        .submit(&CheckInSubmission::new(ciphertext))
        .await
        .context("submission failed")?;

    println!("✅ {}", ack.message);
    if let Some(echoed) = ack.echoed {
        println!("echo: {}", echoed);
    }
    Ok(())
}

fn run_roundtrip(text: String) -> anyhow::Result<()> {
    let cipher = CheckInCipher::fixed();
    let ciphertext = cipher.encrypt(&text).context("encryption failed")?;
    let recovered = cipher.decrypt(&ciphertext).context("decryption failed")?;

    anyhow::ensure!(recovered == text, "round-trip mismatch");
    println!("✅ round-trip ok ({} -> {} bytes)", text.len(), ciphertext.len());
    Ok(())
}

fn print_outcome(outcome: &CheckInOutcome) {
    match outcome {
        CheckInOutcome::Success {
            message,
            completed_at,
            echoed_payload,
        } => {
            println!("✅ {}", message);
            println!("checked in at: {}", completed_at.to_rfc3339());
            println!("payload: {}", echoed_payload);
        }
        CheckInOutcome::Failure { reason, detail } => {
            println!("❌ {}", reason.message());
            if let Some(hint) = reason.hint() {
                println!("{}", hint);
            }
            if let Some(detail) = detail {
                println!("detail: {}", detail);
            }
        }
    }
}
