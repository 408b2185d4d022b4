//! Bybit v5 request signing (header HMAC)
//!
//! The signature is HMAC-SHA256 over `timestamp + api_key + recv_window +
//! payload`, where the payload is the JSON body for POST and the query string
//! for GET. Timestamp, recv window, key and signature each get their own
//! `X-BAPI-*` header; the body goes out exactly as signed.

use crate::errors::{ExchangeError, Result};
use crate::http::HttpMethod;
use crate::signing::{
    build_query_string, hmac_sha256_hex, require_credentials, BodyEncoding, ExchangeCredentials,
    RequestSpec, SignedRequest, SigningScheme,
};

use serde_json::Value;
use tracing::debug;

pub const API_KEY_HEADER: &str = "X-BAPI-API-KEY";
pub const TIMESTAMP_HEADER: &str = "X-BAPI-TIMESTAMP";
pub const RECV_WINDOW_HEADER: &str = "X-BAPI-RECV-WINDOW";
pub const SIGN_HEADER: &str = "X-BAPI-SIGN";

#[derive(Debug, Clone)]
pub struct HeaderScheme {
    recv_window_ms: u64,
}

impl HeaderScheme {
    pub fn new(recv_window_ms: u64) -> Self {
        Self { recv_window_ms }
    }
}

impl Default for HeaderScheme {
    fn default() -> Self {
        Self::new(5000)
    }
}

impl SigningScheme for HeaderScheme {
    fn name(&self) -> &'static str {
        "bybit-header-hmac"
    }

    fn sign_at(
        &self,
        spec: RequestSpec,
        credentials: &ExchangeCredentials,
        timestamp: u64,
    ) -> Result<SignedRequest> {
        let mut headers = Vec::new();

        let (body_encoding, payload) = match spec.method {
            HttpMethod::Get => (BodyEncoding::None, build_query_string(&spec.params)),
            HttpMethod::Post => {
                // BTreeMap serializes with sorted keys
                let json = serde_json::to_string(&spec.params)
                    .map_err(|e| ExchangeError::SigningError(format!("JSON body: {e}")))?;
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                (BodyEncoding::Json, json)
            }
        };

        let signature = if spec.requires_signature {
            require_credentials(self.name(), credentials)?;

            let recv_window = self.recv_window_ms.to_string();
            let prehash = format!("{timestamp}{}{recv_window}{payload}", credentials.api_key());
            let sig = hmac_sha256_hex(credentials.secret_key(), &prehash)?;

            headers.push((API_KEY_HEADER.to_string(), credentials.api_key().to_string()));
            headers.push((TIMESTAMP_HEADER.to_string(), timestamp.to_string()));
            headers.push((RECV_WINDOW_HEADER.to_string(), recv_window));
            headers.push((SIGN_HEADER.to_string(), sig.clone()));
            Some(sig)
        } else {
            None
        };

        let (query, body) = match body_encoding {
            BodyEncoding::Json => (String::new(), Some(payload)),
            _ => (payload, None),
        };

        debug!("🔐 {} {} {} (signed: {})", self.name(), spec.method, spec.endpoint, signature.is_some());

        Ok(SignedRequest {
            spec,
            headers,
            body_encoding,
            signature,
            timestamp,
            query,
            body,
        })
    }

    /// Bybit reports success only as `retCode == 0`; a missing code is a failure
    fn embedded_failure(&self, body: &Value) -> bool {
        body.get("retCode").and_then(Value::as_i64) != Some(0)
    }
}
