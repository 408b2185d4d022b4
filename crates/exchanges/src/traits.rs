//! Uniform exchange capability

use crate::errors::Result;
use crate::types::{OrderRequest, OrderResult};
use async_trait::async_trait;
use bestex_core::Fixed;

/// What the router needs from a venue: a price and a market order.
///
/// Futures are `?Send`: everything runs on one monoio thread.
#[async_trait(?Send)]
pub trait Exchange {
    /// Stable lowercase id ("binance", "bybit")
    fn id(&self) -> &str;

    /// Last traded price for `symbol`, fetched now
    async fn get_price(&self, symbol: &str) -> Result<Fixed>;

    /// Signed market order. The amount is sent verbatim; whether it is
    /// base or quote currency is stated by `order.quantity.kind()`.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult>;
}
