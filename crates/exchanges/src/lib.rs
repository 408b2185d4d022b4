//! # bestex exchange adapters
//!
//! Spot REST integrations for Binance and Bybit behind one [`Exchange`]
//! capability: fetch the last price, place a signed market order.
//!
//! ## Architecture
//!
//! - **monoio-based HTTPS client** - rustls over monoio TCP, behind [`HttpTransport`]
//! - **Pluggable signing** - each venue's HMAC scheme is a [`SigningScheme`]
//! - **Exact decimals** - prices and amounts stay as [`bestex_core::Fixed`]
//! - **Closed venue set** - [`ExchangeClient`] dispatches by `match`

pub mod errors;
pub mod types;
pub mod http;
pub mod signing;
pub mod config;
pub mod rest;
pub mod traits;
pub mod binance;
pub mod bybit;
pub mod client;

// Re-export main types
pub use binance::BinanceClient;
pub use bybit::BybitClient;
pub use client::ExchangeClient;
pub use config::{ExchangeConfig, ExchangeKind};
pub use errors::{ExchangeError, Result};
pub use http::{HttpTransport, MonoioHttpsClient};
pub use signing::{ExchangeCredentials, SigningScheme};
pub use traits::Exchange;
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::binance::BinanceClient;
    pub use crate::bybit::BybitClient;
    pub use crate::client::ExchangeClient;
    pub use crate::config::{ExchangeConfig, ExchangeKind};
    pub use crate::errors::{ExchangeError, Result};
    pub use crate::http::{HttpTransport, MonoioHttpsClient};
    pub use crate::traits::Exchange;
    pub use crate::types::*;
    pub use bestex_core::prelude::*;
}
