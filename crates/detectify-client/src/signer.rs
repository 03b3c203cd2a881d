//! Per-request signatures for the Detectify API.
//!
//! Every call carries an HMAC-SHA256 signature over the method, the
//! normalised path, the caller identity, a Unix timestamp and the body text.
//! The server rejects stale timestamps, so a signature must be produced
//! immediately before its request is sent.

use crate::error::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use detectify_core::Credentials;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 signature.
pub const SIGNATURE_HEADER: &str = "x-detectify-signature";

/// Header carrying the Unix timestamp the signature was made at.
pub const TIMESTAMP_HEADER: &str = "x-detectify-timestamp";

/// Request body, either already textual or structured.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Sent and signed verbatim
    Text(String),
    /// Serialized to canonical JSON text before signing and sending
    Json(Value),
}

impl Payload {
    /// The exact text that is signed and written to the wire.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Signature and timestamp to attach to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Base64-encoded HMAC-SHA256 digest
    pub signature: String,
    /// Unix seconds, as sent in the timestamp header
    pub timestamp: String,
}

impl Signature {
    /// Header name/value pairs for this signature.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            (SIGNATURE_HEADER, self.signature.as_str()),
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
        ]
    }
}

/// Signs requests with a static shared secret.
///
/// The secret is base64-decoded once at construction and zeroized on drop.
pub struct RequestSigner {
    api_key: String,
    key: Zeroizing<Vec<u8>>,
    signing_prefix: String,
    debug: bool,
}

impl RequestSigner {
    /// Create a signer from credentials.
    ///
    /// `signing_prefix` is stripped from URI paths that start with it
    /// (followed by `/`) before they are signed.
    ///
    /// # Errors
    /// Returns error if the secret is not valid base64.
    pub fn new(credentials: &Credentials, signing_prefix: impl Into<String>) -> Result<Self> {
        let key = Zeroizing::new(BASE64.decode(credentials.secret().trim())?);

        Ok(Self {
            api_key: credentials.api_key().to_string(),
            key,
            signing_prefix: signing_prefix.into(),
            debug: false,
        })
    }

    /// Log every signed message at debug level.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sign a request using the current wall-clock time.
    #[must_use]
    pub fn sign(&self, method: &str, uri: &str, payload: Option<&Payload>) -> Signature {
        self.sign_at(method, uri, payload, chrono::Utc::now().timestamp())
    }

    /// Sign a request as if it were made at `timestamp` (Unix seconds).
    #[must_use]
    pub fn sign_at(
        &self,
        method: &str,
        uri: &str,
        payload: Option<&Payload>,
        timestamp: i64,
    ) -> Signature {
        let timestamp = timestamp.to_string();
        let message = self.message(method, uri, payload, &timestamp);

        if self.debug {
            tracing::debug!(target: "detectify::wire", "signing {}", message);
        }

        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC-SHA-256 accepts keys of any size");
        mac.update(message.as_bytes());

        Signature {
            signature: BASE64.encode(mac.finalize().into_bytes()),
            timestamp,
        }
    }

    /// Build the semicolon-delimited string that gets signed.
    fn message(
        &self,
        method: &str,
        uri: &str,
        payload: Option<&Payload>,
        timestamp: &str,
    ) -> String {
        let body = payload.map(Payload::to_text).unwrap_or_default();

        format!(
            "{};{};{};{};{}",
            method.to_uppercase(),
            self.signing_path(uri),
            self.api_key,
            timestamp,
            body
        )
    }

    /// Path component of `uri` with the signing prefix removed.
    ///
    /// Accepts absolute URIs as well as bare paths.
    fn signing_path(&self, uri: &str) -> String {
        let path = match url::Url::parse(uri) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => uri.split(&['?', '#'][..]).next().unwrap_or_default().to_string(),
        };

        if self.signing_prefix.is_empty() {
            return path;
        }

        match path.strip_prefix(self.signing_prefix.as_str()) {
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => path,
        }
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("api_key", &self.api_key)
            .field("signing_prefix", &self.signing_prefix)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
