//! Wire types for the Detectify endpoints the scan workflow uses.
//!
//! Only the fields the workflow reads are modelled; anything else the API
//! returns is ignored. Missing tokens come through as empty strings so the
//! caller can decide how to treat them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered scan target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Registered domain name, e.g. `example.com`
    pub name: String,
    /// Opaque domain token
    #[serde(default)]
    pub token: String,
}

/// A scan configuration bound to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProfile {
    /// Profile name; the workflow names profiles after their endpoint
    pub name: String,
    /// Opaque profile token
    #[serde(default)]
    pub token: String,
    /// Ownership verification status
    #[serde(default)]
    pub status: ProfileStatus,
    /// Scanned endpoint, when the API includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Body of `POST /profiles/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProfileRequest {
    /// Domain the profile belongs to
    pub domain_token: String,
    /// Profile name
    pub name: String,
    /// Endpoint to scan
    pub endpoint: String,
    /// Reject duplicates server-side
    pub unique: bool,
    /// Mark the endpoint as valid
    pub valid: bool,
}

impl CreateProfileRequest {
    /// Profile for `domain` whose name and endpoint are both the domain itself.
    #[must_use]
    pub fn for_domain(domain_token: impl Into<String>, domain: &str) -> Self {
        Self {
            domain_token: domain_token.into(),
            name: domain.to_string(),
            endpoint: domain.to_string(),
            unique: true,
            valid: true,
        }
    }
}

/// Current scan state of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatus {
    /// Lifecycle stage
    #[serde(default)]
    pub state: ScanState,
}

/// Ownership verification status of a scan profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProfileStatus {
    /// Ownership confirmed; scans may run
    Verified,
    /// Verification pending
    #[default]
    Unverified,
    /// Anything else the API reports
    Other(String),
}

impl ProfileStatus {
    /// Whether this is one of the two statuses the workflow understands.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Verified => "verified",
            Self::Unverified => "unverified",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for ProfileStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "verified" => Self::Verified,
            "unverified" => Self::Unverified,
            _ => Self::Other(value),
        }
    }
}

impl From<ProfileStatus> for String {
    fn from(status: ProfileStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stage of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanState {
    /// Queued and spinning up
    Starting,
    /// In progress
    Running,
    /// Winding down
    Stopping,
    /// Finished; a report is available
    Stopped,
    /// Anything else the API reports
    Other(String),
}

impl ScanState {
    /// Whether a scan is currently in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Running | Self::Stopping)
    }

    /// Whether this is one of the four states the workflow understands.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Other(other) => other,
        }
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ScanState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "starting" => Self::Starting,
            "running" => Self::Running,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            _ => Self::Other(value),
        }
    }
}

impl From<ScanState> for String {
    fn from(state: ScanState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
