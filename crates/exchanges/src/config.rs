//! Per-exchange configuration
//!
//! Resolves which venue, which base URL (testnet or production) and which
//! credentials an exchange client is built with. Secrets come from the
//! environment; nothing here is written back anywhere.

use crate::errors::{ExchangeError, Result};
use crate::signing::ExchangeCredentials;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable selecting testnet (default) or production
pub const TESTNET_ENV: &str = "BESTEX_TESTNET";

/// Supported venues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangeKind {
    Binance,
    Bybit,
}

impl ExchangeKind {
    pub fn id(&self) -> &'static str {
        match self {
            ExchangeKind::Binance => "binance",
            ExchangeKind::Bybit => "bybit",
        }
    }

    pub fn production_url(&self) -> &'static str {
        match self {
            ExchangeKind::Binance => "https://api.binance.com",
            ExchangeKind::Bybit => "https://api.bybit.com",
        }
    }

    pub fn testnet_url(&self) -> &'static str {
        match self {
            ExchangeKind::Binance => "https://testnet.binance.vision",
            ExchangeKind::Bybit => "https://api-testnet.bybit.com",
        }
    }

    /// (api key var, secret var)
    pub fn env_vars(&self) -> (&'static str, &'static str) {
        match self {
            ExchangeKind::Binance => ("BINANCE_API_KEY", "BINANCE_SECRET_KEY"),
            ExchangeKind::Bybit => ("BYBIT_API_KEY", "BYBIT_SECRET_KEY"),
        }
    }
}

impl std::fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ExchangeKind {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(ExchangeKind::Binance),
            "bybit" => Ok(ExchangeKind::Bybit),
            other => Err(ExchangeError::ConfigurationError(format!("Unknown exchange: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub kind: ExchangeKind,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub testnet: bool,
    /// How long after `timestamp` the server still accepts a signed request
    pub recv_window_ms: u64,
}

impl ExchangeConfig {
    /// Production endpoints, no credentials
    pub fn new(kind: ExchangeKind) -> Self {
        Self {
            kind,
            api_key: String::new(),
            api_secret: String::new(),
            base_url: kind.production_url().to_string(),
            testnet: false,
            recv_window_ms: 5000,
        }
    }

    pub fn testnet(kind: ExchangeKind) -> Self {
        Self {
            base_url: kind.testnet_url().to_string(),
            testnet: true,
            ..Self::new(kind)
        }
    }

    pub fn binance() -> Self {
        Self::new(ExchangeKind::Binance)
    }

    pub fn binance_testnet() -> Self {
        Self::testnet(ExchangeKind::Binance)
    }

    pub fn bybit() -> Self {
        Self::new(ExchangeKind::Bybit)
    }

    pub fn bybit_testnet() -> Self {
        Self::testnet(ExchangeKind::Bybit)
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self.api_secret = api_secret.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    /// Load credentials from the exchange's environment variables, failing if absent
    pub fn with_env_credentials(mut self) -> Result<Self> {
        let (key_var, secret_var) = self.kind.env_vars();

        self.api_key = std::env::var(key_var)
            .map_err(|_| ExchangeError::MissingCredentials(key_var.to_string()))?;
        self.api_secret = std::env::var(secret_var)
            .map_err(|_| ExchangeError::MissingCredentials(secret_var.to_string()))?;
        Ok(self)
    }

    /// Testnet unless `BESTEX_TESTNET` is "false"; credentials if present.
    /// Missing credentials leave the client usable for public price queries.
    pub fn from_env(kind: ExchangeKind) -> Self {
        let testnet = std::env::var(TESTNET_ENV)
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let base = if testnet { Self::testnet(kind) } else { Self::new(kind) };

        match base.clone().with_env_credentials() {
            Ok(config) => config,
            Err(e) => {
                warn!("⚠️  {}: {} not set, public endpoints only", kind, e);
                base
            }
        }
    }

    pub fn credentials(&self) -> ExchangeCredentials {
        ExchangeCredentials::new(self.api_key.clone(), self.api_secret.clone())
    }
}
