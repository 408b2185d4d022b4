//! Routing event hooks
//!
//! The aggregator never logs directly about quotes and orders; it reports to
//! a [`RouteObserver`]. [`TracingObserver`] is the default.

use bestex_core::{log_error, log_order};
use bestex_exchanges::{ExchangeError, OrderRequest, OrderResult, PriceQuote};
use tracing::info;

/// Every method defaults to doing nothing
pub trait RouteObserver {
    fn quote_received(&self, _quote: &PriceQuote) {}

    fn quote_failed(&self, _exchange_id: &str, _symbol: &str, _error: &ExchangeError) {}

    fn order_placed(&self, _order: &OrderRequest, _result: &OrderResult) {}

    fn order_rejected(&self, _exchange_id: &str, _order: &OrderRequest, _error: &ExchangeError) {}
}

/// Info for quotes and fills, error for failures
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RouteObserver for TracingObserver {
    fn quote_received(&self, quote: &PriceQuote) {
        info!("💹 {} {} @ {}", quote.exchange_id, quote.symbol, quote.price);
    }

    fn quote_failed(&self, exchange_id: &str, symbol: &str, error: &ExchangeError) {
        log_error!(format!("{exchange_id} price for {symbol}"), error);
    }

    fn order_placed(&self, order: &OrderRequest, result: &OrderResult) {
        log_order!(
            format!("PLACED #{}", result.order_id),
            result.exchange_id,
            order.side,
            order.quantity,
            order.symbol
        );
    }

    fn order_rejected(&self, exchange_id: &str, order: &OrderRequest, error: &ExchangeError) {
        log_error!(
            format!("{exchange_id} order {} {} {}", order.side, order.quantity, order.symbol),
            error
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RouteObserver for SilentObserver {}

#[cfg(any(test, feature = "testing"))]
pub mod recording {
    //! Observer that remembers what it saw

    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    pub enum RouteEvent {
        QuoteReceived { exchange_id: String, price: String },
        QuoteFailed { exchange_id: String, error: ExchangeError },
        OrderPlaced { exchange_id: String, order_id: String },
        OrderRejected { exchange_id: String, error: ExchangeError },
    }

    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        events: RefCell<Vec<RouteEvent>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<RouteEvent> {
            self.events.borrow().clone()
        }

        pub fn failures(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    RouteEvent::QuoteFailed { exchange_id, .. } => Some(exchange_id.clone()),
                    _ => None,
                })
                .collect()
        }

        fn push(&self, event: RouteEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    impl RouteObserver for RecordingObserver {
        fn quote_received(&self, quote: &PriceQuote) {
            self.push(RouteEvent::QuoteReceived {
                exchange_id: quote.exchange_id.clone(),
                price: quote.price.to_string(),
            });
        }

        fn quote_failed(&self, exchange_id: &str, _symbol: &str, error: &ExchangeError) {
            self.push(RouteEvent::QuoteFailed {
                exchange_id: exchange_id.to_string(),
                error: error.clone(),
            });
        }

        fn order_placed(&self, _order: &OrderRequest, result: &OrderResult) {
            self.push(RouteEvent::OrderPlaced {
                exchange_id: result.exchange_id.clone(),
                order_id: result.order_id.clone(),
            });
        }

        fn order_rejected(&self, exchange_id: &str, _order: &OrderRequest, error: &ExchangeError) {
            self.push(RouteEvent::OrderRejected {
                exchange_id: exchange_id.to_string(),
                error: error.clone(),
            });
        }
    }
}
