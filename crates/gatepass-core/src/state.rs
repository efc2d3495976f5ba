//! Session state machine

use crate::CheckInOutcome;

/// Workflow session state.
///
/// Exactly one value is active at a time; every transition in the
/// check-in flow is a move between these variants. Invalid flag
/// combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the user to start scanning
    Idle,
    /// Camera running, decode loop armed
    Scanning,
    /// Decode received; encrypting and submitting
    Processing,
    /// Terminal outcome awaiting an explicit user reset
    Resulted(CheckInOutcome),
}

impl SessionState {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Scanning => "Scanning",
            Self::Processing => "Checking in",
            Self::Resulted(outcome) if outcome.is_success() => "Check-in complete",
            Self::Resulted(_) => "Check-in failed",
        }
    }

    /// Whether this state requires a user reset to leave
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resulted(_))
    }
}
