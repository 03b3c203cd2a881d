//! End-to-end workflow tests through the real client against a mock API.

use detectify_client::{ApiError, DetectifyClient};
use detectify_core::{ApiConfig, Credentials, PollingConfig};
use detectify_scanner::{ScanError, ScanOrchestrator};
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator_for(server: &MockServer) -> ScanOrchestrator<DetectifyClient> {
    let api = ApiConfig {
        base_url: format!("{}/rest/v2", server.uri()),
        timeout_secs: 10,
        ..ApiConfig::default()
    };
    // "secret"
    let client = DetectifyClient::new(&api, &Credentials::new("key", "c2VjcmV0"))
        .expect("create client");

    ScanOrchestrator::new(
        client,
        PollingConfig {
            max_attempts: 5,
            interval_ms: 0,
            fail_on_timeout: true,
        },
    )
}

#[tokio::test]
async fn test_full_workflow_with_scan_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v2/domains/"))
        .and(header_exists("x-detectify-signature"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"name": "d.com", "token": "dt"}])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/profiles/dt/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "d.com", "token": "pt", "status": "verified"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/scans/pt/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "running"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/scans/pt/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "stopped"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/fullreports/pt/latest/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"findings": []})))
        .expect(1)
        .mount(&server)
        .await;

    let report = orchestrator_for(&server)
        .scan_domain("d.com")
        .await
        .expect("scan domain");

    assert_eq!(report, json!({"findings": []}));
}

#[tokio::test]
async fn test_full_workflow_creates_profile_and_triggers_scan() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v2/domains/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "example.com", "token": "dt"}
        ])))
        .mount(&server)
        .await;
    // Profile list: empty on lookup, then the new profile once verified
    Mock::given(method("GET"))
        .and(path("/rest/v2/profiles/dt/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/profiles/dt/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "example.com", "token": "p-new", "status": "verified"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v2/profiles/"))
        .and(body_json(json!({
            "domain_token": "dt",
            "name": "example.com",
            "endpoint": "example.com",
            "unique": true,
            "valid": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "example.com", "token": "p-new", "status": "unverified"
        })))
        .expect(1)
        .mount(&server)
        .await;
    // Scan state: idle, then running after the trigger, then stopped
    Mock::given(method("GET"))
        .and(path("/rest/v2/scans/p-new/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "stopped"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/scans/p-new/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "running"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/scans/p-new/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "stopped"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v2/scans/p-new/"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v2/fullreports/p-new/latest/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"findings": [{"title": "XSS"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = orchestrator_for(&server)
        .scan_domain("example.com")
        .await
        .expect("scan domain");

    assert_eq!(report, json!({"findings": [{"title": "XSS"}]}));
}

#[tokio::test]
async fn test_rejected_credentials_abort_workflow() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v2/domains/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = orchestrator_for(&server)
        .scan_domain("d.com")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScanError::Api(ApiError::Request { status: 401, .. })
    ));
}
