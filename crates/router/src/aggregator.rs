//! Concurrent quote aggregation and best-price routing

use crate::observer::{RouteObserver, TracingObserver};
use crate::selection::select_best;

use bestex_core::{log_latency, Fixed, PerfTimer, Timestamp};
use bestex_exchanges::{
    Exchange, ExchangeError, OrderRequest, OrderResult, PriceQuote, Quantity, Result, Side,
};
use futures::future::join_all;
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, info};

/// Winner of one quote round. Only meaningful for that round: prices move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestQuote {
    pub exchange_id: String,
    pub symbol: String,
    pub side: Side,
    pub price: Fixed,
    pub fetched_at: Timestamp,
    #[serde(skip)]
    index: usize,
}

impl BestQuote {
    /// Milliseconds since the winning price was fetched
    pub fn age_millis(&self) -> u64 {
        self.fetched_at.elapsed_millis()
    }
}

impl std::fmt::Display for BestQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} @ {} on {}", self.side, self.symbol, self.price, self.exchange_id)
    }
}

/// Routes orders to whichever configured exchange quotes best.
///
/// Exchange order is significant: it breaks price ties.
pub struct Aggregator<E: Exchange> {
    exchanges: Vec<E>,
    observer: Rc<dyn RouteObserver>,
}

impl<E: Exchange> Aggregator<E> {
    pub fn new(exchanges: Vec<E>) -> Self {
        Self {
            exchanges,
            observer: Rc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Rc<dyn RouteObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn exchanges(&self) -> &[E] {
        &self.exchanges
    }

    /// One price per exchange, in configured order, queried concurrently
    pub async fn quotes(&self, symbol: &str) -> Vec<Result<PriceQuote>> {
        let timer = PerfTimer::start(format!("quote_round_{symbol}"));

        let queries = self.exchanges.iter().map(|exchange| async move {
            exchange
                .get_price(symbol)
                .await
                .map(|price| PriceQuote::new(exchange.id(), symbol, price))
        });
        let quotes = join_all(queries).await;

        log_latency!(format!("{} quotes for {}", quotes.len(), symbol), timer.elapsed_micros());
        quotes
    }

    /// Best quote for a typed side. Failed exchanges are reported and skipped.
    pub async fn best_quote(&self, symbol: &str, side: Side) -> Result<BestQuote> {
        let quotes = self.quotes(symbol).await;

        let mut survivors = Vec::with_capacity(quotes.len());
        for (index, (exchange, quote)) in self.exchanges.iter().zip(quotes).enumerate() {
            match quote {
                Ok(quote) => {
                    self.observer.quote_received(&quote);
                    survivors.push((index, quote));
                }
                Err(e) => self.observer.quote_failed(exchange.id(), symbol, &e),
            }
        }

        let (index, _) = select_best(side, survivors.iter().map(|(i, q)| (*i, q.price)))
            .ok_or_else(|| ExchangeError::NoQuoteAvailable {
                symbol: symbol.to_string(),
            })?;

        let winner = survivors
            .into_iter()
            .find(|(i, _)| *i == index)
            .map(|(_, quote)| quote)
            .ok_or_else(|| ExchangeError::NoQuoteAvailable {
                symbol: symbol.to_string(),
            })?;

        let best = BestQuote {
            exchange_id: winner.exchange_id,
            symbol: winner.symbol,
            side,
            price: winner.price,
            fetched_at: winner.fetched_at,
            index,
        };
        info!("🏆 Best {}", best);
        Ok(best)
    }

    /// Best quote for `side` given as text ("buy"/"sell", any case).
    /// An unknown side fails before any exchange is contacted.
    pub async fn get_best_price(&self, symbol: &str, side: &str) -> Result<BestQuote> {
        let side: Side = side.parse()?;
        self.best_quote(symbol, side).await
    }

    /// Fresh quote round, then a market order on the winner.
    ///
    /// No retry and no fallback to the runner-up: whatever the winning
    /// exchange says is returned as is. If no exchange quotes, no order is sent.
    pub async fn place_order(&self, side: &str, quantity: Quantity, symbol: &str) -> Result<OrderResult> {
        let side: Side = side.parse()?;
        let best = self.best_quote(symbol, side).await?;
        let order = OrderRequest::new(side, quantity, symbol);
        self.place_order_at(&best, &order).await
    }

    /// Send `order` to the exchange that produced `best`, however old it is.
    ///
    /// The quote must come from this aggregator and match the order's side
    /// and symbol.
    pub async fn place_order_at(&self, best: &BestQuote, order: &OrderRequest) -> Result<OrderResult> {
        if best.side != order.side || best.symbol != order.symbol {
            return Err(ExchangeError::ConfigurationError(format!(
                "quote ({best}) does not match order ({order})"
            )));
        }

        let exchange = self
            .exchanges
            .get(best.index)
            .filter(|e| e.id() == best.exchange_id)
            .ok_or_else(|| {
                ExchangeError::ConfigurationError(format!(
                    "{} is not configured at position {}",
                    best.exchange_id, best.index
                ))
            })?;

        debug!("➡️  Routing {} to {} (quote age {}ms)", order, exchange.id(), best.age_millis());

        match exchange.place_order(order).await {
            Ok(result) => {
                self.observer.order_placed(order, &result);
                Ok(result)
            }
            Err(e) => {
                self.observer.order_rejected(exchange.id(), order, &e);
                Err(e)
            }
        }
    }
}
