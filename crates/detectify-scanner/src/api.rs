//! API operations the scan workflow depends on.

use async_trait::async_trait;
use detectify_client::{
    CreateProfileRequest, DetectifyClient, Domain, Result, ScanProfile, ScanStatus,
};
use detectify_core::{DomainToken, ProfileToken};
use serde_json::Value;
use std::sync::Arc;

/// The six Detectify calls the workflow makes.
///
/// Implemented by [`DetectifyClient`]; tests substitute scripted doubles.
#[async_trait]
pub trait DetectifyApi: Send + Sync {
    /// All registered domains.
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// Scan profiles belonging to a domain.
    async fn list_profiles(&self, domain: &DomainToken) -> Result<Vec<ScanProfile>>;

    /// Create a scan profile.
    async fn create_profile(&self, request: &CreateProfileRequest) -> Result<ScanProfile>;

    /// Current scan state of a profile.
    async fn scan_status(&self, profile: &ProfileToken) -> Result<ScanStatus>;

    /// Trigger a scan for a profile.
    async fn start_scan(&self, profile: &ProfileToken) -> Result<Value>;

    /// Latest full report for a profile.
    async fn latest_full_report(&self, profile: &ProfileToken) -> Result<Value>;
}

#[async_trait]
impl DetectifyApi for DetectifyClient {
    async fn list_domains(&self) -> Result<Vec<Domain>> {
        DetectifyClient::list_domains(self).await
    }

    async fn list_profiles(&self, domain: &DomainToken) -> Result<Vec<ScanProfile>> {
        DetectifyClient::list_profiles(self, domain).await
    }

    async fn create_profile(&self, request: &CreateProfileRequest) -> Result<ScanProfile> {
        DetectifyClient::create_profile(self, request).await
    }

    async fn scan_status(&self, profile: &ProfileToken) -> Result<ScanStatus> {
        DetectifyClient::scan_status(self, profile).await
    }

    async fn start_scan(&self, profile: &ProfileToken) -> Result<Value> {
        DetectifyClient::start_scan(self, profile).await
    }

    async fn latest_full_report(&self, profile: &ProfileToken) -> Result<Value> {
        DetectifyClient::latest_full_report(self, profile).await
    }
}

#[async_trait]
impl<T: DetectifyApi + ?Sized> DetectifyApi for Arc<T> {
    async fn list_domains(&self) -> Result<Vec<Domain>> {
        (**self).list_domains().await
    }

    async fn list_profiles(&self, domain: &DomainToken) -> Result<Vec<ScanProfile>> {
        (**self).list_profiles(domain).await
    }

    async fn create_profile(&self, request: &CreateProfileRequest) -> Result<ScanProfile> {
        (**self).create_profile(request).await
    }

    async fn scan_status(&self, profile: &ProfileToken) -> Result<ScanStatus> {
        (**self).scan_status(profile).await
    }

    async fn start_scan(&self, profile: &ProfileToken) -> Result<Value> {
        (**self).start_scan(profile).await
    }

    async fn latest_full_report(&self, profile: &ProfileToken) -> Result<Value> {
        (**self).latest_full_report(profile).await
    }
}
