//! Network edge of the check-in client
//!
//! The connectivity signal plus the submission client that carries one
//! check-in POST to the remote endpoint.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod connectivity;
pub mod error;
pub mod submit;

pub use connectivity::ConnectivityMonitor;
pub use error::{Error, Result};
pub use submit::{
    CheckInAck, CheckInSubmission, DeviceInfo, HttpSubmissionClient, SimulatedSubmissionClient,
    SubmissionClient, DEFAULT_ENDPOINT_URL,
};
