//! Error types for the scan workflow.

use detectify_client::ApiError;
use std::fmt;
use thiserror::Error;

/// Polling phase of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Waiting for the scan profile to become verified
    Verification,
    /// Waiting for the scan to stop
    Completion,
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verification => f.write_str("profile verification"),
            Self::Completion => f.write_str("scan completion"),
        }
    }
}

/// Errors that abort a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("the domain {domain} could not be found among the registered domains")]
    DomainNotFound { domain: String },

    #[error("the profile token for {domain} was missing or empty")]
    ProfileToken { domain: String },

    #[error("no scan profile named {domain} was returned while polling")]
    ProfileNotFound { domain: String },

    #[error("scan profile {domain} is in unexpected state '{status}'")]
    ProfileState { domain: String, status: String },

    #[error("scan is in unexpected state '{state}'")]
    ScanState { state: String },

    #[error("{phase} did not finish after {attempts} attempts")]
    PollTimeout { phase: PollPhase, attempts: u32 },

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
