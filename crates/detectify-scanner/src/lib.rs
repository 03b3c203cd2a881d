//! Detectify Scanner - domain scan workflow orchestration.
//!
//! This crate drives the Detectify API through one fixed workflow: find the
//! registered domain, make sure a verified scan profile exists for it, start
//! or observe a scan, wait for it to stop, and fetch the latest full report.
//!
//! # Features
//!
//! - Substring domain lookup and profile reuse-or-create
//! - Bounded verification and completion polling with a fixed delay
//! - Selectable behaviour when polls run out (proceed or fail)
//! - API access behind the [`DetectifyApi`] trait for substitution in tests
//!
//! # Example
//!
//! ```rust,no_run
//! use detectify_client::DetectifyClient;
//! use detectify_core::{AppConfig, Credentials};
//! use detectify_scanner::ScanOrchestrator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let client = DetectifyClient::new(&config.api, &Credentials::from_env()?)?;
//!
//! let orchestrator = ScanOrchestrator::new(client, config.polling);
//! let report = orchestrator.scan_domain("example.com").await?;
//! println!("{report:#}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod error;
pub mod orchestrator;

// Re-export commonly used types
pub use api::DetectifyApi;
pub use error::{PollPhase, Result, ScanError};
pub use orchestrator::ScanOrchestrator;
