//! Binance spot REST client

use crate::binance::auth::QueryStringScheme;
use crate::config::{ExchangeConfig, ExchangeKind};
use crate::errors::{ExchangeError, Result};
use crate::http::HttpTransport;
use crate::rest::RestAdapter;
use crate::signing::RequestSpec;
use crate::traits::Exchange;
use crate::types::{Balance, OrderRequest, OrderResult, QuantityKind, Side};

use async_trait::async_trait;
use bestex_core::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const TICKER_PRICE: &str = "/api/v3/ticker/price";
const ORDER: &str = "/api/v3/order";
const ACCOUNT: &str = "/api/v3/account";

/// Assets reported by [`BinanceClient::get_balance`] when none are named
pub const DEFAULT_BALANCE_ASSETS: [&str; 2] = ["BTC", "USDT"];

pub struct BinanceClient<T: HttpTransport> {
    rest: RestAdapter<T>,
}

impl<T: HttpTransport> BinanceClient<T> {
    pub fn new(config: &ExchangeConfig, transport: Arc<T>) -> Result<Self> {
        if config.kind != ExchangeKind::Binance {
            return Err(ExchangeError::ConfigurationError(format!(
                "Binance client given {} config",
                config.kind
            )));
        }

        let rest = RestAdapter::new(
            ExchangeKind::Binance.id(),
            &config.base_url,
            config.credentials(),
            Box::new(QueryStringScheme::new(config.recv_window_ms)),
            transport,
        )?;

        info!("✅ Binance client ready ({}, testnet: {})", config.base_url, config.testnet);
        Ok(Self { rest })
    }

    /// Free and locked balances for `assets` (BTC and USDT if empty)
    pub async fn get_balance(&self, assets: &[&str]) -> Result<Vec<Balance>> {
        let wanted: &[&str] = if assets.is_empty() { &DEFAULT_BALANCE_ASSETS } else { assets };

        let response = self.rest.call(RequestSpec::signed_get(ACCOUNT)).await?;
        let entries = response["balances"]
            .as_array()
            .ok_or_else(|| ExchangeError::Decode(format!("account response has no balances: {response}")))?;

        entries
            .iter()
            .filter(|entry| entry["asset"].as_str().is_some_and(|a| wanted.contains(&a)))
            .map(|entry| {
                Ok(Balance {
                    asset: entry["asset"].as_str().unwrap_or_default().to_string(),
                    free: parse_decimal(&entry["free"], "free")?,
                    locked: parse_decimal(&entry["locked"], "locked")?,
                })
            })
            .collect()
    }
}

fn parse_decimal(value: &Value, field: &str) -> Result<Fixed> {
    Fixed::from_json(value).map_err(|e| ExchangeError::Decode(format!("balance {field}: {e}")))
}

fn side_param(side: Side) -> &'static str {
    match side {
        Side::Buy => "BUY",
        Side::Sell => "SELL",
    }
}

/// Binance takes base amounts as `quantity` and quote amounts as `quoteOrderQty`
fn quantity_param(kind: QuantityKind) -> &'static str {
    match kind {
        QuantityKind::Base => "quantity",
        QuantityKind::Quote => "quoteOrderQty",
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> Exchange for BinanceClient<T> {
    fn id(&self) -> &str {
        self.rest.exchange_id()
    }

    async fn get_price(&self, symbol: &str) -> Result<Fixed> {
        let spec = RequestSpec::public_get(TICKER_PRICE).param("symbol", symbol);
        let response = self.rest.call(spec).await?;

        let unavailable = |reason: String| ExchangeError::PriceUnavailable {
            exchange: self.id().to_string(),
            reason,
        };

        let price = Fixed::from_json(&response["price"])
            .map_err(|e| unavailable(format!("price field: {e} in {response}")))?;
        if !price.is_positive() {
            return Err(unavailable(format!("non-positive price {price} for {symbol}")));
        }
        Ok(price)
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult> {
        let client_order_id = ClientOrderId::new();
        let spec = RequestSpec::signed_post(ORDER)
            .param("symbol", order.symbol.as_str())
            .param("side", side_param(order.side))
            .param("type", "MARKET")
            .param(quantity_param(order.quantity.kind()), order.quantity.amount())
            .param("newClientOrderId", client_order_id.as_str());

        let response = self
            .rest
            .call(spec)
            .await
            .map_err(|e| e.into_order_error(self.id(), order))?;

        let order_id = match &response["orderId"] {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => {
                return Err(ExchangeError::Decode(format!(
                    "order response has no orderId: {response}"
                )))
            }
        };

        Ok(OrderResult {
            exchange_id: self.id().to_string(),
            order_id,
            client_order_id,
            raw: response,
        })
    }
}
