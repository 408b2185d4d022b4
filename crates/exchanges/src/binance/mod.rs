//! Binance spot integration
//!
//! Public ticker prices, signed market orders and account balances over the
//! v3 REST API. Requests are signed with [`auth::QueryStringScheme`].

pub mod auth;
pub mod rest;

pub use auth::QueryStringScheme;
pub use rest::{BinanceClient, DEFAULT_BALANCE_ASSETS};
