//! Request signing contract shared by every exchange
//!
//! An adapter turns a [`RequestSpec`] into a [`SignedRequest`] through the
//! [`SigningScheme`] chosen for its exchange when the adapter is built.
//! Parameters live in a `BTreeMap`, so every encoding below sees keys in
//! lexicographic order and the signature is reproducible by the server.

use crate::errors::{ExchangeError, Result};
use crate::http::{HttpMethod, HttpRequest};

use bestex_core::millis;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::collections::BTreeMap;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// API key pair. May be empty when only public endpoints are used.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ExchangeCredentials {
    api_key: String,
    secret_key: String,
}

impl ExchangeCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// No keys, public endpoints only
    pub fn public() -> Self {
        Self::default()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Both halves present
    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

impl std::fmt::Debug for ExchangeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// What to call, before any exchange-specific encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub endpoint: String,
    pub params: BTreeMap<String, String>,
    pub requires_signature: bool,
}

impl RequestSpec {
    /// Unsigned GET
    pub fn public_get(endpoint: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            endpoint: endpoint.to_string(),
            params: BTreeMap::new(),
            requires_signature: false,
        }
    }

    pub fn signed_get(endpoint: &str) -> Self {
        Self {
            requires_signature: true,
            ..Self::public_get(endpoint)
        }
    }

    pub fn signed_post(endpoint: &str) -> Self {
        Self {
            method: HttpMethod::Post,
            requires_signature: true,
            ..Self::public_get(endpoint)
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Parameters travel in the URL query string, no body
    None,
    /// `application/x-www-form-urlencoded`
    Form,
    /// `application/json`
    Json,
}

/// A request after the exchange's signing scheme has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub spec: RequestSpec,
    pub headers: Vec<(String, String)>,
    pub body_encoding: BodyEncoding,
    /// Hex HMAC, absent for unsigned requests
    pub signature: Option<String>,
    /// Milliseconds since epoch, taken when this request was signed
    pub timestamp: u64,
    /// Encoded query string without the leading '?'
    pub query: String,
    pub body: Option<String>,
}

impl SignedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Resolve against the exchange base URL
    pub fn to_http_request(&self, base_url: &Url) -> Result<HttpRequest> {
        let mut url = base_url.clone();
        url.set_path(&self.spec.endpoint);
        url.set_query((!self.query.is_empty()).then_some(self.query.as_str()));

        Ok(HttpRequest {
            method: self.spec.method,
            url: url.to_string(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        })
    }
}

/// One exchange family's conventions: how requests are signed and encoded,
/// and how the family reports application errors inside a 2xx response.
pub trait SigningScheme {
    /// Scheme name for logs
    fn name(&self) -> &'static str;

    /// Sign `spec` as of `timestamp` (ms). Pure: same inputs, same output.
    fn sign_at(
        &self,
        spec: RequestSpec,
        credentials: &ExchangeCredentials,
        timestamp: u64,
    ) -> Result<SignedRequest>;

    /// Sign with a fresh timestamp taken right now
    fn sign_and_build(&self, spec: RequestSpec, credentials: &ExchangeCredentials) -> Result<SignedRequest> {
        self.sign_at(spec, credentials, millis())
    }

    /// True when a decoded 2xx body still reports failure
    fn embedded_failure(&self, body: &Value) -> bool;
}

/// `k1=v1&k2=v2` with keys in map order and URL-encoded values
pub fn build_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Lowercase hex HMAC-SHA256 of `payload` keyed with `secret`
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::SigningError(format!("HMAC setup failed: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub(crate) fn require_credentials(scheme: &str, credentials: &ExchangeCredentials) -> Result<()> {
    if credentials.is_valid() {
        Ok(())
    } else {
        Err(ExchangeError::MissingCredentials(format!(
            "{scheme} signed request needs an API key and secret"
        )))
    }
}
