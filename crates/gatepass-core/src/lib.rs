//! Core types for the Gatepass check-in client
//!
//! Shared data model, error taxonomy, and the payload cipher used by the
//! capture, network, and workflow crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
pub mod error;
pub mod outcome;
pub mod state;

pub use crypto::CheckInCipher;
pub use error::{Error, Result};
pub use outcome::{CheckInOutcome, FailureReason, ScanPayload};
pub use state::SessionState;
