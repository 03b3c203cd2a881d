//! Scan orchestrator for a single domain.
//!
//! This module provides the `ScanOrchestrator` which walks one domain
//! through lookup, profile verification, scan triggering, completion
//! polling and report retrieval, strictly one request at a time.

use crate::api::DetectifyApi;
use crate::error::{PollPhase, Result, ScanError};
use detectify_client::{CreateProfileRequest, ProfileStatus, ScanState};
use detectify_core::{DomainToken, PollingConfig, ProfileToken};
use serde_json::Value;
use std::time::Duration;

/// Orchestrates the scan workflow against a [`DetectifyApi`].
pub struct ScanOrchestrator<A> {
    /// API used for every call
    api: A,
    /// Attempt count, delay and exhaustion behaviour for both polling phases
    polling: PollingConfig,
}

impl<A: DetectifyApi> ScanOrchestrator<A> {
    /// Create a new scan orchestrator.
    #[must_use]
    pub fn new(api: A, polling: PollingConfig) -> Self {
        Self { api, polling }
    }

    /// The API this orchestrator drives.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Produce the latest full report for `domain`.
    ///
    /// May create a scan profile and may trigger a new scan on the service.
    pub async fn scan_domain(&self, domain: &str) -> Result<Value> {
        tracing::info!("Starting scan workflow for {}", domain);

        let domain_token = self.resolve_domain_token(domain).await?;
        let (profile_token, status) = self.resolve_profile(domain, &domain_token).await?;

        self.await_verification(domain, &domain_token, status)
            .await?;

        let state = self.ensure_scan_active(&profile_token).await?;
        self.await_completion(&profile_token, state).await?;

        tracing::info!("Fetching latest full report for {}", domain);
        Ok(self.api.latest_full_report(&profile_token).await?)
    }

    /// Find the registered domain whose name occurs in `domain`.
    ///
    /// `www.example.com` resolves to a registered `example.com`. The first
    /// match in API order wins.
    pub async fn resolve_domain_token(&self, domain: &str) -> Result<DomainToken> {
        let domains = self.api.list_domains().await?;

        let matched = domains
            .into_iter()
            .find(|d| !d.name.is_empty() && domain.contains(d.name.as_str()))
            .ok_or_else(|| ScanError::DomainNotFound {
                domain: domain.to_string(),
            })?;

        tracing::debug!("Domain {} matched registered domain {}", domain, matched.name);

        DomainToken::new(matched.token).ok_or_else(|| ScanError::DomainNotFound {
            domain: domain.to_string(),
        })
    }

    /// Reuse the profile named `domain`, or create one.
    ///
    /// Returns the profile token together with the status the profile had
    /// when it was looked up or created.
    pub async fn resolve_profile(
        &self,
        domain: &str,
        domain_token: &DomainToken,
    ) -> Result<(ProfileToken, ProfileStatus)> {
        let profiles = self.api.list_profiles(domain_token).await?;

        let profile = if let Some(existing) = profiles.into_iter().find(|p| p.name == domain) {
            tracing::debug!("Reusing scan profile {} for {}", existing.token, domain);
            existing
        } else {
            tracing::info!("No scan profile for {}, creating one", domain);
            self.api
                .create_profile(&CreateProfileRequest::for_domain(
                    domain_token.as_str(),
                    domain,
                ))
                .await?
        };

        let token = ProfileToken::new(profile.token).ok_or_else(|| ScanError::ProfileToken {
            domain: domain.to_string(),
        })?;

        Ok((token, profile.status))
    }

    /// Poll the profile list until the profile named `domain` is verified.
    ///
    /// Any status other than verified or unverified aborts immediately.
    pub async fn await_verification(
        &self,
        domain: &str,
        domain_token: &DomainToken,
        initial: ProfileStatus,
    ) -> Result<ProfileStatus> {
        if initial == ProfileStatus::Verified {
            return Ok(initial);
        }

        let max = self.polling.max_attempts;
        let mut status = initial;

        for attempt in 1..=max {
            let profiles = self.api.list_profiles(domain_token).await?;
            let profile = profiles
                .into_iter()
                .find(|p| p.name == domain)
                .ok_or_else(|| ScanError::ProfileNotFound {
                    domain: domain.to_string(),
                })?;

            status = profile.status;
            match &status {
                ProfileStatus::Verified => {
                    tracing::info!("Scan profile for {} verified", domain);
                    return Ok(ProfileStatus::Verified);
                }
                ProfileStatus::Unverified => {}
                ProfileStatus::Other(other) => {
                    return Err(ScanError::ProfileState {
                        domain: domain.to_string(),
                        status: other.clone(),
                    });
                }
            }

            if attempt < max {
                tracing::debug!(
                    "Profile {} unverified (attempt {}/{}), checking again in {:?}...",
                    domain,
                    attempt,
                    max,
                    self.interval()
                );
                tokio::time::sleep(self.interval()).await;
            }
        }

        self.exhausted(PollPhase::Verification)?;
        Ok(status)
    }

    /// Make sure a scan is in flight, triggering one if needed.
    ///
    /// Returns the state observed after any trigger.
    pub async fn ensure_scan_active(&self, profile: &ProfileToken) -> Result<ScanState> {
        let status = self.api.scan_status(profile).await?;
        if status.state.is_active() {
            tracing::info!("Scan already {} for profile {}", status.state, profile);
            return Ok(status.state);
        }

        tracing::info!(
            "Scan is '{}' for profile {}, starting a new one",
            status.state,
            profile
        );
        self.api.start_scan(profile).await?;

        Ok(self.api.scan_status(profile).await?.state)
    }

    /// Poll scan status until the scan has stopped.
    ///
    /// Any state outside starting, running, stopping and stopped aborts
    /// immediately.
    pub async fn await_completion(
        &self,
        profile: &ProfileToken,
        initial: ScanState,
    ) -> Result<ScanState> {
        if initial == ScanState::Stopped {
            return Ok(initial);
        }

        let max = self.polling.max_attempts;
        let mut state = initial;

        for attempt in 1..=max {
            state = self.api.scan_status(profile).await?.state;

            if !state.is_known() {
                return Err(ScanError::ScanState {
                    state: state.to_string(),
                });
            }
            if state == ScanState::Stopped {
                tracing::info!("Scan stopped for profile {}", profile);
                return Ok(ScanState::Stopped);
            }

            if attempt < max {
                tracing::debug!(
                    "Scan {} for profile {} (attempt {}/{}), checking again in {:?}...",
                    state,
                    profile,
                    attempt,
                    max,
                    self.interval()
                );
                tokio::time::sleep(self.interval()).await;
            }
        }

        self.exhausted(PollPhase::Completion)?;
        Ok(state)
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    /// Decide what running out of attempts means.
    fn exhausted(&self, phase: PollPhase) -> Result<()> {
        let attempts = self.polling.max_attempts;
        if self.polling.fail_on_timeout {
            return Err(ScanError::PollTimeout { phase, attempts });
        }

        tracing::warn!(
            "{} did not finish after {} attempts, continuing anyway",
            phase,
            attempts
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polling_bounds() {
        let polling = PollingConfig::default();
        // 20 polls, 5 s apart: under two minutes per phase
        assert_eq!(polling.max_attempts, 20);
        assert_eq!(polling.interval_ms, 5000);
        assert!(u64::from(polling.max_attempts) * polling.interval_ms <= 100_000);
    }

    #[test]
    fn test_default_polling_proceeds_on_exhaustion() {
        assert!(!PollingConfig::default().fail_on_timeout);
    }
}
