//! Bybit v5 spot integration
//!
//! Ticker prices and market orders, signed with [`auth::HeaderScheme`].

pub mod auth;
pub mod rest;

pub use auth::HeaderScheme;
pub use rest::BybitClient;
