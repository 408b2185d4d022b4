//! Bybit v5 spot REST client

use crate::bybit::auth::HeaderScheme;
use crate::config::{ExchangeConfig, ExchangeKind};
use crate::errors::{ExchangeError, Result};
use crate::http::HttpTransport;
use crate::rest::RestAdapter;
use crate::signing::RequestSpec;
use crate::traits::Exchange;
use crate::types::{OrderRequest, OrderResult, QuantityKind, Side};

use async_trait::async_trait;
use bestex_core::prelude::*;
use std::sync::Arc;
use tracing::info;

const TICKERS: &str = "/v5/market/tickers";
const ORDER_CREATE: &str = "/v5/order/create";
const CATEGORY: &str = "spot";

pub struct BybitClient<T: HttpTransport> {
    rest: RestAdapter<T>,
}

impl<T: HttpTransport> BybitClient<T> {
    pub fn new(config: &ExchangeConfig, transport: Arc<T>) -> Result<Self> {
        if config.kind != ExchangeKind::Bybit {
            return Err(ExchangeError::ConfigurationError(format!(
                "Bybit client given {} config",
                config.kind
            )));
        }

        let rest = RestAdapter::new(
            ExchangeKind::Bybit.id(),
            &config.base_url,
            config.credentials(),
            Box::new(HeaderScheme::new(config.recv_window_ms)),
            transport,
        )?;

        info!("✅ Bybit client ready ({}, testnet: {})", config.base_url, config.testnet);
        Ok(Self { rest })
    }

    fn unavailable(&self, reason: String) -> ExchangeError {
        ExchangeError::PriceUnavailable {
            exchange: self.id().to_string(),
            reason,
        }
    }
}

fn side_param(side: Side) -> &'static str {
    match side {
        Side::Buy => "Buy",
        Side::Sell => "Sell",
    }
}

fn market_unit(kind: QuantityKind) -> &'static str {
    match kind {
        QuantityKind::Base => "baseCoin",
        QuantityKind::Quote => "quoteCoin",
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> Exchange for BybitClient<T> {
    fn id(&self) -> &str {
        self.rest.exchange_id()
    }

    async fn get_price(&self, symbol: &str) -> Result<Fixed> {
        let spec = RequestSpec::public_get(TICKERS)
            .param("category", CATEGORY)
            .param("symbol", symbol);
        let response = self.rest.call(spec).await?;

        let ticker = response["result"]["list"]
            .as_array()
            .and_then(|list| list.first())
            .ok_or_else(|| self.unavailable(format!("no ticker for {symbol}")))?;

        let price = Fixed::from_json(&ticker["lastPrice"])
            .map_err(|e| self.unavailable(format!("lastPrice field: {e} in {ticker}")))?;
        if !price.is_positive() {
            return Err(self.unavailable(format!("non-positive lastPrice {price} for {symbol}")));
        }
        Ok(price)
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult> {
        let client_order_id = ClientOrderId::new();
        let spec = RequestSpec::signed_post(ORDER_CREATE)
            .param("category", CATEGORY)
            .param("symbol", order.symbol.as_str())
            .param("side", side_param(order.side))
            .param("orderType", "Market")
            .param("qty", order.quantity.amount())
            .param("marketUnit", market_unit(order.quantity.kind()))
            .param("orderLinkId", client_order_id.as_str());

        let response = self
            .rest
            .call(spec)
            .await
            .map_err(|e| e.into_order_error(self.id(), order))?;

        let order_id = response["result"]["orderId"]
            .as_str()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ExchangeError::Decode(format!("order response has no orderId: {response}")))?
            .to_string();

        Ok(OrderResult {
            exchange_id: self.id().to_string(),
            order_id,
            client_order_id,
            raw: response,
        })
    }
}
