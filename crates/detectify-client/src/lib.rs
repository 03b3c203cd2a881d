//! Detectify Client - signed access to the Detectify REST API.
//!
//! This crate provides the request signer and the single-request executor
//! used by the scan workflow, plus typed wrappers for the endpoints it calls.
//!
//! # Features
//!
//! - **Request Signing**: HMAC-SHA256 over method, path, identity, timestamp and body
//! - **Single-Shot Requests**: no retries, gzip-aware, strict status mapping
//! - **Typed Endpoints**: domains, scan profiles, scans and full reports
//!
//! # Example
//!
//! ```rust,no_run
//! use detectify_client::DetectifyClient;
//! use detectify_core::{AppConfig, Credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let credentials = Credentials::from_env()?;
//! let client = DetectifyClient::new(&config.api, &credentials)?;
//!
//! for domain in client.list_domains().await? {
//!     println!("{} ({})", domain.name, domain.token);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Signing
//!
//! ```text
//! METHOD ; path-without-/rest ; api-key ; unix-seconds ; body
//!            ↓ HMAC-SHA256(base64-decoded secret)
//! x-detectify-signature: base64(mac)   x-detectify-timestamp: unix-seconds
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod error;
pub mod models;
pub mod signer;

// Re-export commonly used types
pub use client::DetectifyClient;
pub use error::{ApiError, Result};
pub use models::{CreateProfileRequest, Domain, ProfileStatus, ScanProfile, ScanState, ScanStatus};
pub use signer::{Payload, RequestSigner, Signature};
