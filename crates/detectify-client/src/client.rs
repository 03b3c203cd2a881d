//! Single-request executor for the Detectify REST API.
//!
//! One call, one signed request, one response. No retries happen at this
//! layer; callers decide whether and how to poll.

use crate::error::{ApiError, Result};
use crate::models::{CreateProfileRequest, Domain, ScanProfile, ScanStatus};
use crate::signer::{Payload, RequestSigner};
use detectify_core::{ApiConfig, Credentials, DomainToken, ProfileToken};
use flate2::read::GzDecoder;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH,
    CONTENT_TYPE,
};
use reqwest::{redirect, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::io::Read;
use std::time::Duration;

/// Header carrying the caller's service token.
pub const IDENTITY_HEADER: &str = "x-detectify-key";

/// Detectify API client.
///
/// Headers that identify the caller are fixed at construction; only the
/// signature headers differ from one request to the next.
pub struct DetectifyClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
    signer: RequestSigner,
    debug: bool,
}

impl DetectifyClient {
    /// Create a client for the API described by `config`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created, the API key is not
    /// a valid header value, or the signing secret is not valid base64.
    pub fn new(config: &ApiConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| ApiError::Internal(format!("failed to create HTTP client: {e}")))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            IDENTITY_HEADER,
            HeaderValue::from_str(credentials.api_key())
                .map_err(|e| ApiError::Internal(format!("invalid API key header: {e}")))?,
        );
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let signer =
            RequestSigner::new(credentials, config.signing_prefix.clone())?.with_debug(config.debug);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_headers,
            signer,
            debug: config.debug,
        })
    }

    /// Absolute URI for an endpoint path relative to the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform one signed request and return the parsed JSON body.
    ///
    /// A `202 Accepted` resolves to an empty object without reading the body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> Result<Value> {
        let uri = self.endpoint(path);
        let url = url::Url::parse(&uri)?;

        let mut builder = self
            .client
            .request(method.clone(), url)
            .headers(self.default_headers.clone());

        let body = payload.map(Payload::to_text);
        if let Some(body) = &body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .header(CONTENT_LENGTH, body.len())
                .body(body.clone());
        }

        // Signed last so the timestamp is as fresh as possible.
        let signature = self.signer.sign(method.as_str(), &uri, payload);
        for (name, value) in signature.headers() {
            builder = builder.header(name, value);
        }

        if self.debug {
            tracing::debug!(
                target: "detectify::wire",
                "request {} {} body={}",
                method,
                uri,
                body.as_deref().unwrap_or("")
            );
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_encoding = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        if self.debug {
            tracing::debug!(
                target: "detectify::wire",
                "response {} {:?}",
                status,
                response.headers()
            );
        }

        if status == StatusCode::ACCEPTED {
            return Ok(Value::Object(Map::new()));
        }

        let bytes = response.bytes().await?;
        let value = interpret_response(status, content_encoding.as_deref(), &bytes);

        if self.debug {
            if let Ok(value) = &value {
                tracing::debug!(target: "detectify::wire", "response data {}", value);
            }
        }

        value
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.request(Method::GET, path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `GET /domains/`
    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        self.get_json("domains/").await
    }

    /// `GET /profiles/{domain_token}/`
    pub async fn list_profiles(&self, domain: &DomainToken) -> Result<Vec<ScanProfile>> {
        self.get_json(&format!("profiles/{domain}/")).await
    }

    /// `POST /profiles/`
    pub async fn create_profile(&self, request: &CreateProfileRequest) -> Result<ScanProfile> {
        let payload = Payload::Json(serde_json::to_value(request)?);
        let value = self
            .request(Method::POST, "profiles/", Some(&payload))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `GET /scans/{profile_token}/`
    pub async fn scan_status(&self, profile: &ProfileToken) -> Result<ScanStatus> {
        self.get_json(&format!("scans/{profile}/")).await
    }

    /// `POST /scans/{profile_token}/`
    ///
    /// The acknowledgement body is returned as-is; it usually is empty.
    pub async fn start_scan(&self, profile: &ProfileToken) -> Result<Value> {
        self.request(Method::POST, &format!("scans/{profile}/"), None)
            .await
    }

    /// `GET /fullreports/{profile_token}/latest/`
    pub async fn latest_full_report(&self, profile: &ProfileToken) -> Result<Value> {
        self.request(Method::GET, &format!("fullreports/{profile}/latest/"), None)
            .await
    }
}

/// Map a response status and body to a result.
///
/// 202 yields an empty object; anything outside 200..=399 is a request
/// error; otherwise the body is gunzipped when declared gzip and parsed.
pub fn interpret_response(
    status: StatusCode,
    content_encoding: Option<&str>,
    body: &[u8],
) -> Result<Value> {
    if status == StatusCode::ACCEPTED {
        return Ok(Value::Object(Map::new()));
    }

    let code = status.as_u16();
    if !(200..=399).contains(&code) {
        return Err(ApiError::Request {
            status: code,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    if content_encoding == Some("gzip") {
        let mut inflated = Vec::new();
        GzDecoder::new(body)
            .read_to_end(&mut inflated)
            .map_err(ApiError::Decompression)?;
        return Ok(serde_json::from_slice(&inflated)?);
    }

    Ok(serde_json::from_slice(body)?)
}
