//! Closed set of supported venues behind one type

use crate::binance::BinanceClient;
use crate::bybit::BybitClient;
use crate::config::{ExchangeConfig, ExchangeKind};
use crate::errors::Result;
use crate::http::{HttpTransport, MonoioHttpsClient};
use crate::traits::Exchange;
use crate::types::{OrderRequest, OrderResult};

use async_trait::async_trait;
use bestex_core::Fixed;
use std::sync::Arc;

pub enum ExchangeClient<T: HttpTransport = MonoioHttpsClient> {
    Binance(BinanceClient<T>),
    Bybit(BybitClient<T>),
}

impl<T: HttpTransport> ExchangeClient<T> {
    pub fn from_config(config: &ExchangeConfig, transport: Arc<T>) -> Result<Self> {
        Ok(match config.kind {
            ExchangeKind::Binance => Self::Binance(BinanceClient::new(config, transport)?),
            ExchangeKind::Bybit => Self::Bybit(BybitClient::new(config, transport)?),
        })
    }

    pub fn kind(&self) -> ExchangeKind {
        match self {
            Self::Binance(_) => ExchangeKind::Binance,
            Self::Bybit(_) => ExchangeKind::Bybit,
        }
    }
}

impl ExchangeClient<MonoioHttpsClient> {
    /// Binance then Bybit, configured from the environment, sharing one TLS client
    pub fn from_env_all() -> Result<Vec<Self>> {
        let transport = Arc::new(MonoioHttpsClient::new());
        [ExchangeKind::Binance, ExchangeKind::Bybit]
            .into_iter()
            .map(|kind| Self::from_config(&ExchangeConfig::from_env(kind), transport.clone()))
            .collect()
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> Exchange for ExchangeClient<T> {
    fn id(&self) -> &str {
        match self {
            Self::Binance(c) => c.id(),
            Self::Bybit(c) => c.id(),
        }
    }

    async fn get_price(&self, symbol: &str) -> Result<Fixed> {
        match self {
            Self::Binance(c) => c.get_price(symbol).await,
            Self::Bybit(c) => c.get_price(symbol).await,
        }
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult> {
        match self {
            Self::Binance(c) => c.place_order(order).await,
            Self::Bybit(c) => c.place_order(order).await,
        }
    }
}
