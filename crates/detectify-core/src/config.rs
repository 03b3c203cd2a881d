//! Configuration management for the Detectify scan client.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Credentials are only ever taken from
//! the environment and never serialized.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Environment variable holding the caller's service token.
pub const TOKEN_ENV: &str = "DETECTIFY_TOKEN";

/// Environment variable holding the base64-encoded signing secret.
pub const SECRET_ENV: &str = "DETECTIFY_SECRET_TOKEN";

/// Main application configuration.
///
/// This is loaded from `~/.config/detectify-scan/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API endpoint and transport settings
    pub api: ApiConfig,
    /// Verification and completion polling settings
    pub polling: PollingConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// Supports the following environment variables:
    /// - `DETECTIFY_BASE_URL`: Override the API base URL
    /// - `DETECTIFY_DEBUG`: Enable wire-level debug logging (true/false/1/0)
    /// - `DETECTIFY_POLL_ATTEMPTS`: Override the per-phase poll attempt count
    /// - `DETECTIFY_POLL_INTERVAL_MS`: Override the delay between polls
    /// - `DETECTIFY_FAIL_ON_POLL_TIMEOUT`: Fail instead of proceeding when polls run out
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides using an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("DETECTIFY_BASE_URL") {
            tracing::debug!("Override api.base_url from env: {}", val);
            self.api.base_url = val;
        }

        if let Some(val) = lookup("DETECTIFY_DEBUG") {
            self.api.debug = parse_flag("DETECTIFY_DEBUG", &val)?;
        }

        if let Some(val) = lookup("DETECTIFY_POLL_ATTEMPTS") {
            self.polling.max_attempts = val.parse().map_err(|_| ConfigError::InvalidValue {
                field: "DETECTIFY_POLL_ATTEMPTS".to_string(),
                reason: format!("expected a positive integer, got '{val}'"),
            })?;
            tracing::debug!(
                "Override polling.max_attempts from env: {}",
                self.polling.max_attempts
            );
        }

        if let Some(val) = lookup("DETECTIFY_POLL_INTERVAL_MS") {
            self.polling.interval_ms = val.parse().map_err(|_| ConfigError::InvalidValue {
                field: "DETECTIFY_POLL_INTERVAL_MS".to_string(),
                reason: format!("expected milliseconds, got '{val}'"),
            })?;
        }

        if let Some(val) = lookup("DETECTIFY_FAIL_ON_POLL_TIMEOUT") {
            self.polling.fail_on_timeout = parse_flag("DETECTIFY_FAIL_ON_POLL_TIMEOUT", &val)?;
        }

        self.validate()
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/detectify-scan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "detectify", "detectify-scan")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn parse_flag(field: &str, val: &str) -> ConfigResult<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

/// API endpoint and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Versioned REST root every endpoint path is appended to
    pub base_url: String,
    /// Path prefix removed from the URI path before signing
    pub signing_prefix: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Log signed messages, outgoing requests and raw responses.
    ///
    /// Exposes the inputs of the signature; keep off outside local debugging.
    pub debug: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.detectify.com/rest/v2".to_string(),
            signing_prefix: "/rest".to_string(),
            timeout_secs: 60,
            debug: false,
        }
    }
}

/// Verification and completion polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Maximum polls per phase
    pub max_attempts: u32,
    /// Delay between polls in milliseconds
    pub interval_ms: u64,
    /// Fail with a poll timeout instead of proceeding once attempts run out
    pub fail_on_timeout: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval_ms: 5000,
            fail_on_timeout: false,
        }
    }
}

/// Static shared-secret credentials for request signing.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret: Zeroizing<String>,
}

impl Credentials {
    /// Build credentials from an API key and a base64-encoded secret.
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: Zeroizing::new(secret.into()),
        }
    }

    /// Read `DETECTIFY_TOKEN` and `DETECTIFY_SECRET_TOKEN` from the environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read credentials using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnv {
                    var: var.to_string(),
                })
        };

        Ok(Self::new(require(TOKEN_ENV)?, require(SECRET_ENV)?))
    }

    /// The caller's service token, sent as the identity header.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The base64-encoded signing secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}
