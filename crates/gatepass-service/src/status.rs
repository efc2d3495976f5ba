//! UI-facing status model
//!
//! Everything the rendering layer's status bar shows, as data.

use gatepass_core::SessionState;

/// Rough device class for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Phone or tablet
    Mobile,
    /// Everything else
    Desktop,
}

impl DeviceClass {
    /// Classify the running platform
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "android" | "ios" => Self::Mobile,
            _ => Self::Desktop,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
        }
    }
}

/// Camera permission as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Not yet requested
    #[default]
    Unknown,
    /// Granted by the user
    Granted,
    /// Refused by the user
    Denied,
}

impl PermissionState {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

/// One render-ready snapshot of the status bar data
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    /// Current workflow state
    pub state: SessionState,
    /// Device class
    pub device: DeviceClass,
    /// Whether a camera is present
    pub has_camera: bool,
    /// Camera permission as last observed
    pub permission: PermissionState,
    /// Network reachability
    pub online: bool,
}

impl StatusSnapshot {
    /// Status-bar summary line
    pub fn summary(&self) -> String {
        format!(
            "{} | {} | camera: {} | permission: {} | network: {}",
            self.state.name(),
            self.device.name(),
            if self.has_camera {
                "available"
            } else {
                "unavailable"
            },
            self.permission.name(),
            if self.online {
                "connected"
            } else {
                "disconnected"
            },
        )
    }
}
