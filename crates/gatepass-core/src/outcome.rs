//! Check-in outcome model
//!
//! One `CheckInOutcome` is created per submission attempt, owned by the
//! workflow controller, and discarded on reset.

use chrono::{DateTime, Utc};
use std::fmt;

/// Decoded QR payload.
///
/// Opaque to everything outside the decoder; lives only within one
/// workflow iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPayload(String);

impl ScanPayload {
    /// Wrap a decoded string
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    /// Borrow the decoded text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the decoded text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ScanPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a check-in attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Connectivity was lost before submission
    Offline,
    /// Capture session ended before a code was decoded
    CaptureClosed,
    /// Payload encryption failed
    Encryption,
    /// Connection-level submission failure
    Network,
    /// Server rejected the submission with this status
    Http(u16),
    /// Server response was not the expected structured form
    MalformedResponse,
    /// Submission timed out
    Timeout,
}

impl FailureReason {
    /// Human-readable failure message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Offline => "Internet connection required.",
            Self::CaptureClosed => "The camera is no longer available.",
            Self::Encryption => "Failed to encrypt check-in data.",
            Self::Network => "Check-in request failed.",
            Self::Http(_) => "Check-in was rejected by the server.",
            Self::MalformedResponse => "Received an unexpected server response.",
            Self::Timeout => "Check-in request timed out.",
        }
    }

    /// Secondary hint for display, where one helps
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Offline | Self::Network | Self::Timeout => {
                Some("Check your network connection and try again.")
            }
            Self::CaptureClosed => Some("Restart scanning to try again."),
            _ => None,
        }
    }
}

/// Terminal result of one check-in attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// Check-in accepted
    Success {
        /// Server-supplied completion message
        message: String,
        /// Client-stamped completion time
        completed_at: DateTime<Utc>,
        /// The scanned payload, echoed for audit display
        echoed_payload: ScanPayload,
    },
    /// Check-in failed
    Failure {
        /// Why the attempt failed
        reason: FailureReason,
        /// Optional secondary detail
        detail: Option<String>,
    },
}

impl CheckInOutcome {
    /// Whether this outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Display message for either arm
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } => message,
            Self::Failure { reason, .. } => reason.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip() {
        let payload = ScanPayload::new("ABC123");
        assert_eq!(payload.as_str(), "ABC123");
        assert_eq!(payload.to_string(), "ABC123");
        assert_eq!(payload.into_inner(), "ABC123");
    }

    #[test]
    fn test_failure_messages() {
        assert!(FailureReason::Offline.hint().is_some());
        assert!(FailureReason::Encryption.hint().is_none());
        assert!(!FailureReason::Http(500).message().is_empty());
    }

    #[test]
    fn test_outcome_message() {
        let success = CheckInOutcome::Success {
            message: "done".to_string(),
            completed_at: Utc::now(),
            echoed_payload: ScanPayload::new("X"),
        };
        assert!(success.is_success());
        assert_eq!(success.message(), "done");

        let failure = CheckInOutcome::Failure {
            reason: FailureReason::Timeout,
            detail: None,
        };
        assert!(!failure.is_success());
        assert_eq!(failure.message(), FailureReason::Timeout.message());
    }
}
