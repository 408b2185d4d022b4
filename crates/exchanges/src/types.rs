//! Exchange-neutral order and quote types

use bestex_core::prelude::*;
use serde_json::Value;
use std::str::FromStr;

use crate::errors::{ExchangeError, Result};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl FromStr for Side {
    type Err = ExchangeError;

    /// Case-insensitive: "buy", "BUY" and "Buy" are the same side
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(ExchangeError::InvalidSide(s.to_string())),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Which currency a market order amount is denominated in.
///
/// For BTCUSDT, `Base` means BTC and `Quote` means USDT. Exchanges disagree
/// on the default, so the caller must always say which one it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Base,
    Quote,
}

impl std::fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityKind::Base => write!(f, "base"),
            QuantityKind::Quote => write!(f, "quote"),
        }
    }
}

/// Order amount, validated as a positive decimal but sent exactly as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    amount: String,
    kind: QuantityKind,
}

impl Quantity {
    pub fn new(amount: &str, kind: QuantityKind) -> Result<Self> {
        let amount = amount.trim();
        let value = Fixed::from_plain_str(amount)
            .map_err(|e| ExchangeError::InvalidQuantity(format!("{amount:?}: {e}")))?;
        if !value.is_positive() {
            return Err(ExchangeError::InvalidQuantity(format!("{amount:?} must be greater than zero")));
        }

        Ok(Self { amount: amount.to_string(), kind })
    }

    /// Amount in the base asset (BTC for BTCUSDT)
    pub fn base(amount: &str) -> Result<Self> {
        Self::new(amount, QuantityKind::Base)
    }

    /// Amount in the quote asset (USDT for BTCUSDT)
    pub fn quote(amount: &str) -> Result<Self> {
        Self::new(amount, QuantityKind::Quote)
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn kind(&self) -> QuantityKind {
        self.kind
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.kind)
    }
}

/// Market order to route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: Side,
    pub quantity: Quantity,
    pub symbol: String,
}

impl OrderRequest {
    pub fn new(side: Side, quantity: Quantity, symbol: impl Into<String>) -> Self {
        Self {
            side,
            quantity,
            symbol: symbol.into(),
        }
    }
}

impl std::fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.side, self.quantity, self.symbol)
    }
}

/// What an exchange returned for an accepted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub exchange_id: String,
    pub order_id: String,
    pub client_order_id: ClientOrderId,
    /// Full exchange response, untouched
    pub raw: Value,
}

/// One exchange's price for a symbol at one moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub exchange_id: String,
    pub symbol: String,
    pub price: Fixed,
    pub fetched_at: Timestamp,
}

impl PriceQuote {
    pub fn new(exchange_id: impl Into<String>, symbol: impl Into<String>, price: Fixed) -> Self {
        Self {
            exchange_id: exchange_id.into(),
            symbol: symbol.into(),
            price,
            fetched_at: Timestamp::now(),
        }
    }
}

/// Spot balance of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: Fixed,
    pub locked: Fixed,
}

impl Balance {
    pub fn total(&self) -> Fixed {
        self.free + self.locked
    }
}
