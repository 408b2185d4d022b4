//! REST adapter: signing scheme + transport for one exchange
//!
//! Stateless apart from immutable configuration, so one adapter can serve
//! any number of concurrent calls.

use crate::errors::{ExchangeError, Result};
use crate::http::HttpTransport;
use crate::signing::{ExchangeCredentials, RequestSpec, SignedRequest, SigningScheme};

use bestex_core::PerfTimer;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct RestAdapter<T: HttpTransport> {
    exchange_id: &'static str,
    base_url: Url,
    credentials: ExchangeCredentials,
    scheme: Box<dyn SigningScheme>,
    transport: Arc<T>,
}

impl<T: HttpTransport> RestAdapter<T> {
    pub fn new(
        exchange_id: &'static str,
        base_url: &str,
        credentials: ExchangeCredentials,
        scheme: Box<dyn SigningScheme>,
        transport: Arc<T>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ExchangeError::InvalidUrl(format!("{base_url} cannot be a base URL")));
        }

        debug!("🔗 {} adapter: {} ({})", exchange_id, base_url, scheme.name());

        Ok(Self {
            exchange_id,
            base_url,
            credentials,
            scheme,
            transport,
        })
    }

    pub fn exchange_id(&self) -> &'static str {
        self.exchange_id
    }

    /// Apply the exchange's signing scheme with a timestamp taken now
    pub fn sign_and_build(&self, spec: RequestSpec) -> Result<SignedRequest> {
        self.scheme.sign_and_build(spec, &self.credentials)
    }

    /// Send a signed request and decode the JSON body.
    ///
    /// Fails with `Transport` if nothing came back, `Remote` for a non-2xx
    /// status or an embedded failure code, and `Decode` for a non-JSON body.
    pub async fn execute(&self, signed: &SignedRequest) -> Result<Value> {
        let request = signed.to_http_request(&self.base_url)?;
        debug!("📡 {} {} {}", self.exchange_id, request.method, request.url);

        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            return Err(ExchangeError::Remote {
                status_code: response.status,
                body: response.body,
            });
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| ExchangeError::Decode(format!("{e}: {}", response.body)))?;

        if self.scheme.embedded_failure(&body) {
            return Err(ExchangeError::Remote {
                status_code: response.status,
                body: response.body,
            });
        }

        Ok(body)
    }

    /// Sign with a fresh timestamp and execute. One attempt, no retry.
    pub async fn call(&self, spec: RequestSpec) -> Result<Value> {
        let _timer = PerfTimer::start(format!("{}_{}_{}", self.exchange_id, spec.method, spec.endpoint));
        let signed = self.sign_and_build(spec)?;
        self.execute(&signed).await
    }
}
