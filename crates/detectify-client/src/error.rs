//! Error types for Detectify API access.

use thiserror::Error;

/// Errors that can occur while talking to the Detectify API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection-level failure (DNS, TLS, refused, timed out)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response status outside 200..=399
    #[error("unable to complete request, status code response was {status} {status_text}")]
    Request {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase, empty when unknown
        status_text: String,
    },

    /// Body declared gzip but could not be inflated
    #[error("failed to decompress gzip response: {0}")]
    Decompression(#[source] std::io::Error),

    /// Body was not the expected JSON
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Signing secret is not valid base64
    #[error("signing secret is not valid base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    /// Base URL or endpoint path did not form a valid URI
    #[error("invalid request URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if that is what this error is.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
