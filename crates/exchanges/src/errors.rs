//! Exchange error taxonomy
//!
//! Every failure an adapter or client can produce maps to one variant here.
//! Remote diagnostics (HTTP body, exchange `msg`/`retMsg`) are carried
//! verbatim so the caller sees exactly what the venue said.

use thiserror::Error;

use crate::types::OrderRequest;

/// Result type for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    /// Connection, DNS, TLS or socket failure. Never retried here.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not valid JSON (or lacked a field we must have)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Non-2xx status, or a 2xx whose embedded status code signals failure
    #[error("Remote error {status_code}: {body}")]
    Remote { status_code: u16, body: String },

    #[error("Price unavailable from {exchange}: {reason}")]
    PriceUnavailable { exchange: String, reason: String },

    #[error("Order rejected by {exchange} ({order}): {reason}")]
    OrderRejected {
        exchange: String,
        order: String,
        reason: String,
    },

    #[error("Invalid side: {0:?} (expected buy or sell)")]
    InvalidSide(String),

    #[error("No quote available for {symbol}")]
    NoQuoteAvailable { symbol: String },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ExchangeError {
    /// True when the HTTP exchange succeeded but the venue's own status said no
    pub fn is_embedded_failure(&self) -> bool {
        matches!(self, Self::Remote { status_code, .. } if (200..300).contains(status_code))
    }

    /// Turn an embedded failure on an order call into `OrderRejected`.
    /// Transport, decode and HTTP-status failures pass through unchanged.
    pub(crate) fn into_order_error(self, exchange: &str, order: &OrderRequest) -> Self {
        match self {
            Self::Remote { status_code, body } if (200..300).contains(&status_code) => Self::OrderRejected {
                exchange: exchange.to_string(),
                order: order.to_string(),
                reason: body,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ExchangeError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<bestex_core::FixedError> for ExchangeError {
    fn from(err: bestex_core::FixedError) -> Self {
        Self::Decode(err.to_string())
    }
}
