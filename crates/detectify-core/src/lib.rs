//! Detectify Core - Foundation crate for the Detectify scan client.
//!
//! This crate provides configuration loading, credential handling and the
//! shared identifier types that the client and scanner crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes (`DomainToken`, `ProfileToken`)
//!
//! # Example
//!
//! ```rust
//! use detectify_core::AppConfig;
//!
//! let config = AppConfig::default();
//! assert_eq!(config.polling.max_attempts, 20);
//! assert!(!config.api.debug);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, AppConfig, Credentials, PollingConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{DomainToken, ProfileToken};
