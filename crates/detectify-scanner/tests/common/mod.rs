//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use detectify_client::{
    CreateProfileRequest, Domain, ProfileStatus, Result, ScanProfile, ScanState, ScanStatus,
};
use detectify_core::{DomainToken, PollingConfig, ProfileToken};
use detectify_scanner::DetectifyApi;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn domain(name: &str, token: &str) -> Domain {
    Domain {
        name: name.to_string(),
        token: token.to_string(),
    }
}

pub fn profile(name: &str, token: &str, status: &str) -> ScanProfile {
    ScanProfile {
        name: name.to_string(),
        token: token.to_string(),
        status: ProfileStatus::from(status.to_string()),
        endpoint: None,
    }
}

pub fn polling(max_attempts: u32, fail_on_timeout: bool) -> PollingConfig {
    PollingConfig {
        max_attempts,
        interval_ms: 5000,
        fail_on_timeout,
    }
}

/// Number of times each endpoint was called.
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub list_domains: usize,
    pub list_profiles: usize,
    pub created: Vec<CreateProfileRequest>,
    pub scan_status: usize,
    pub start_scan: usize,
    pub report: usize,
}

/// API double answering from scripts.
///
/// Profile lists and scan states are served in order; the last entry
/// repeats once the script runs out.
pub struct ScriptedApi {
    domains: Vec<Domain>,
    profile_lists: Mutex<VecDeque<Vec<ScanProfile>>>,
    created_profile: ScanProfile,
    scan_states: Mutex<VecDeque<String>>,
    report: Value,
    calls: Mutex<Calls>,
}

impl ScriptedApi {
    pub fn new(domains: Vec<Domain>) -> Self {
        Self {
            domains,
            profile_lists: Mutex::new(VecDeque::from([Vec::new()])),
            created_profile: profile("", "", "unverified"),
            scan_states: Mutex::new(VecDeque::from(["stopped".to_string()])),
            report: json!({}),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn with_profile_lists(self, lists: Vec<Vec<ScanProfile>>) -> Self {
        *self.profile_lists.lock().unwrap() = lists.into();
        self
    }

    pub fn with_created_profile(mut self, created: ScanProfile) -> Self {
        self.created_profile = created;
        self
    }

    pub fn with_scan_states(self, states: &[&str]) -> Self {
        *self.scan_states.lock().unwrap() = states.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn with_report(mut self, report: Value) -> Self {
        self.report = report;
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> T {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().expect("script must not be empty")
        }
    }
}

#[async_trait]
impl DetectifyApi for ScriptedApi {
    async fn list_domains(&self) -> Result<Vec<Domain>> {
        self.calls.lock().unwrap().list_domains += 1;
        Ok(self.domains.clone())
    }

    async fn list_profiles(&self, _domain: &DomainToken) -> Result<Vec<ScanProfile>> {
        self.calls.lock().unwrap().list_profiles += 1;
        Ok(Self::next(&self.profile_lists))
    }

    async fn create_profile(&self, request: &CreateProfileRequest) -> Result<ScanProfile> {
        self.calls.lock().unwrap().created.push(request.clone());
        Ok(self.created_profile.clone())
    }

    async fn scan_status(&self, _profile: &ProfileToken) -> Result<ScanStatus> {
        self.calls.lock().unwrap().scan_status += 1;
        Ok(ScanStatus {
            state: ScanState::from(Self::next(&self.scan_states)),
        })
    }

    async fn start_scan(&self, _profile: &ProfileToken) -> Result<Value> {
        self.calls.lock().unwrap().start_scan += 1;
        Ok(json!({}))
    }

    async fn latest_full_report(&self, _profile: &ProfileToken) -> Result<Value> {
        self.calls.lock().unwrap().report += 1;
        Ok(self.report.clone())
    }
}
