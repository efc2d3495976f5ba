//! Service configuration
//!
//! Defaults mirror the public echo deployment; environment variables
//! override individual fields. Presence only, no schema validation.

use gatepass_capture::CameraOptions;
use gatepass_net::DEFAULT_ENDPOINT_URL;
use serde::{Deserialize, Serialize};
use std::env;

/// Workflow service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Check-in endpoint URL
    pub endpoint: String,
    /// Verbose debug logging
    pub debug: bool,
    /// Use the simulated submission client instead of the network
    pub simulate: bool,
    /// Camera capability flags, passed through unchanged
    pub camera: CameraOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT_URL.to_string(),
            debug: false,
            simulate: false,
            camera: CameraOptions::default(),
        }
    }
}

impl ServiceConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = env::var("GATEPASS_ENDPOINT") {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        if env_flag("GATEPASS_DEBUG") {
            config.debug = true;
        }
        if env_flag("GATEPASS_SIMULATE") {
            config.simulate = true;
        }
        config
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
