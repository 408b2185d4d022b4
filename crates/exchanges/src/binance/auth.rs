//! Binance request signing (query-string HMAC)
//!
//! Signed requests get `timestamp` and `recvWindow` added to their
//! parameters. The sorted, URL-encoded parameter string is signed with
//! HMAC-SHA256 and `signature=<hex>` is appended to that same string. GET
//! sends it as the query string; POST sends it as a form body. The API key
//! travels in `X-MBX-APIKEY`.

use crate::errors::Result;
use crate::http::HttpMethod;
use crate::signing::{
    build_query_string, hmac_sha256_hex, require_credentials, BodyEncoding, ExchangeCredentials,
    RequestSpec, SignedRequest, SigningScheme,
};

use serde_json::Value;
use tracing::debug;

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance family success code; any other embedded `code` is an error
const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Clone)]
pub struct QueryStringScheme {
    recv_window_ms: u64,
}

impl QueryStringScheme {
    pub fn new(recv_window_ms: u64) -> Self {
        Self { recv_window_ms }
    }
}

impl Default for QueryStringScheme {
    fn default() -> Self {
        Self::new(5000)
    }
}

impl SigningScheme for QueryStringScheme {
    fn name(&self) -> &'static str {
        "binance-query-hmac"
    }

    fn sign_at(
        &self,
        spec: RequestSpec,
        credentials: &ExchangeCredentials,
        timestamp: u64,
    ) -> Result<SignedRequest> {
        let mut headers = Vec::new();
        let mut signature = None;

        let encoded = if spec.requires_signature {
            require_credentials(self.name(), credentials)?;

            let mut params = spec.params.clone();
            params.insert("timestamp".to_string(), timestamp.to_string());
            params.insert("recvWindow".to_string(), self.recv_window_ms.to_string());

            let payload = build_query_string(&params);
            let sig = hmac_sha256_hex(credentials.secret_key(), &payload)?;
            let encoded = format!("{payload}&signature={sig}");

            headers.push((API_KEY_HEADER.to_string(), credentials.api_key().to_string()));
            signature = Some(sig);
            encoded
        } else {
            build_query_string(&spec.params)
        };

        let (body_encoding, query, body) = match spec.method {
            HttpMethod::Get => (BodyEncoding::None, encoded, None),
            HttpMethod::Post => {
                headers.push((
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ));
                (BodyEncoding::Form, String::new(), Some(encoded))
            }
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

    fn embedded_failure(&self, body: &Value) -> bool {
        body.get("code").is_some_and(|code| code.as_i64() != Some(SUCCESS_CODE))
    }
}
