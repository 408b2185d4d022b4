//! End-to-end routing through real clients over a scripted transport

use crate::support::*;
use bestex_core::fixed;
use bestex_exchanges::http::mock::ScriptedTransport;
use bestex_exchanges::http::HttpMethod;
use bestex_exchanges::{ExchangeError, OrderRequest, Quantity, Side};
use bestex_router::observer::recording::RouteEvent;
use rstest::*;
use serde_json::{json, Value};
use std::sync::Arc;

#[fixture]
fn transport() -> Arc<ScriptedTransport> {
    Arc::new(ScriptedTransport::new())
}

/// Binance at 50000, Bybit at 49950
#[fixture]
fn two_venues(transport: Arc<ScriptedTransport>) -> Arc<ScriptedTransport> {
    script_prices(&transport, "BTCUSDT", Some("50000.00"), Some("49950.00"));
    script_fills(&transport);
    transport
}

#[rstest]
#[case("buy", "bybit", "49950.00")]
#[case("sell", "binance", "50000.00")]
#[monoio::test]
async fn test_best_price_per_side(
    two_venues: Arc<ScriptedTransport>,
    #[case] side: &'static str,
    #[case] exchange: &'static str,
    #[case] price: &'static str,
) {
    let (aggregator, _) = scripted_aggregator(&two_venues);

    let best = aggregator.get_best_price("BTCUSDT", side).await.unwrap();
    assert_eq!(best.exchange_id, exchange);
    assert_eq!(best.price.to_string(), price);
}

#[rstest]
#[monoio::test]
async fn test_buy_order_goes_to_bybit(two_venues: Arc<ScriptedTransport>) {
    let (aggregator, observer) = scripted_aggregator(&two_venues);

    let result = aggregator
        .place_order("buy", Quantity::quote("100").unwrap(), "BTCUSDT")
        .await
        .unwrap();
    assert_eq!(result.exchange_id, "bybit");
    assert_eq!(result.order_id, "bybit-777");

    assert!(two_venues.requests_matching(HttpMethod::Post, BINANCE_ORDER).is_empty());
    let sent = two_venues.requests_matching(HttpMethod::Post, BYBIT_ORDER);
    assert_eq!(sent.len(), 1);
    let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["side"], "Buy");
    assert_eq!(body["qty"], "100");
    assert_eq!(body["marketUnit"], "quoteCoin");

    assert!(observer.events().contains(&RouteEvent::OrderPlaced {
        exchange_id: "bybit".to_string(),
        order_id: "bybit-777".to_string(),
    }));
}

#[rstest]
#[monoio::test]
async fn test_sell_order_goes_to_binance(two_venues: Arc<ScriptedTransport>) {
    let (aggregator, _) = scripted_aggregator(&two_venues);

    let result = aggregator
        .place_order("SELL", Quantity::base("0.002").unwrap(), "BTCUSDT")
        .await
        .unwrap();
    assert_eq!(result.exchange_id, "binance");
    assert_eq!(result.order_id, "4242");

    let sent = two_venues.requests_matching(HttpMethod::Post, BINANCE_ORDER);
    let body = sent[0].body.clone().unwrap();
    assert!(body.contains("side=SELL"));
    assert!(body.contains("quantity=0.002"));
    assert!(two_venues.requests_matching(HttpMethod::Post, BYBIT_ORDER).is_empty());
}

#[rstest]
#[case("buy")]
#[case("sell")]
#[monoio::test]
async fn test_binance_down_routes_to_bybit(transport: Arc<ScriptedTransport>, #[case] side: &'static str) {
    script_prices(&transport, "BTCUSDT", None, Some("49950.00"));
    let (aggregator, observer) = scripted_aggregator(&transport);

    let best = aggregator.get_best_price("BTCUSDT", side).await.unwrap();
    assert_eq!(best.exchange_id, "bybit");
    assert_eq!(best.price, fixed!(49950));
    assert_eq!(observer.failures(), vec!["binance".to_string()]);
}

#[rstest]
#[monoio::test]
async fn test_all_down_places_nothing(transport: Arc<ScriptedTransport>) {
    script_prices(&transport, "BTCUSDT", None, None);
    script_fills(&transport);
    let (aggregator, observer) = scripted_aggregator(&transport);

    let err = aggregator
        .place_order("buy", Quantity::quote("100").unwrap(), "BTCUSDT")
        .await
        .unwrap_err();
    assert_eq!(err, ExchangeError::NoQuoteAvailable { symbol: "BTCUSDT".to_string() });
    assert_eq!(observer.failures().len(), 2);
    assert!(transport.requests().iter().all(|r| r.method == HttpMethod::Get));
}

#[rstest]
#[monoio::test]
async fn test_bybit_embedded_error_is_skipped(transport: Arc<ScriptedTransport>) {
    script_prices(&transport, "BTCUSDT", Some("50000"), None);
    transport.respond_json(
        HttpMethod::Get,
        BYBIT_TICKER,
        200,
        json!({"retCode": 10001, "retMsg": "Not supported symbols"}),
    );
    let (aggregator, observer) = scripted_aggregator(&transport);

    let best = aggregator.get_best_price("BTCUSDT", "buy").await.unwrap();
    assert_eq!(best.exchange_id, "binance");
    match &observer.events()[..] {
        [RouteEvent::QuoteReceived { .. }, RouteEvent::QuoteFailed { exchange_id, error }] => {
            assert_eq!(exchange_id, "bybit");
            assert!(error.is_embedded_failure());
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[rstest]
#[case("0")]
#[case("-5")]
#[monoio::test]
async fn test_non_positive_price_is_skipped(transport: Arc<ScriptedTransport>, #[case] bybit_price: &'static str) {
    script_prices(&transport, "BTCUSDT", Some("50000"), Some(bybit_price));
    script_fills(&transport);
    let (aggregator, observer) = scripted_aggregator(&transport);

    let best = aggregator.get_best_price("BTCUSDT", "buy").await.unwrap();
    assert_eq!(best.exchange_id, "binance");
    assert_eq!(best.price, fixed!(50000));

    match &observer.events()[..] {
        [RouteEvent::QuoteReceived { exchange_id, .. }, RouteEvent::QuoteFailed { exchange_id: failed, error }] => {
            assert_eq!(exchange_id, "binance");
            assert_eq!(failed, "bybit");
            assert!(matches!(error, ExchangeError::PriceUnavailable { .. }));
        }
        other => panic!("unexpected events: {other:?}"),
    }

    let result = aggregator
        .place_order("buy", Quantity::quote("100").unwrap(), "BTCUSDT")
        .await
        .unwrap();
    assert_eq!(result.exchange_id, "binance");
    assert!(transport.requests_matching(HttpMethod::Post, BYBIT_ORDER).is_empty());
}

#[rstest]
#[case("hold")]
#[case("")]
#[case("buyy")]
#[monoio::test]
async fn test_invalid_side_sends_nothing(two_venues: Arc<ScriptedTransport>, #[case] side: &'static str) {
    let (aggregator, _) = scripted_aggregator(&two_venues);

    let err = aggregator.get_best_price("BTCUSDT", side).await.unwrap_err();
    assert_eq!(err, ExchangeError::InvalidSide(side.to_string()));
    assert!(two_venues.requests().is_empty());
}

#[rstest]
#[monoio::test]
async fn test_equal_prices_prefer_binance(transport: Arc<ScriptedTransport>) {
    script_prices(&transport, "ETHUSDT", Some("3000.10"), Some("3000.1"));
    let (aggregator, _) = scripted_aggregator(&transport);

    for side in ["buy", "sell"] {
        let best = aggregator.get_best_price("ETHUSDT", side).await.unwrap();
        assert_eq!(best.exchange_id, "binance");
    }
}

#[rstest]
#[monoio::test]
async fn test_rejected_order_is_not_retried_elsewhere(two_venues: Arc<ScriptedTransport>) {
    two_venues.respond_json(
        HttpMethod::Post,
        BYBIT_ORDER,
        200,
        json!({"retCode": 170131, "retMsg": "Insufficient balance."}),
    );
    let (aggregator, observer) = scripted_aggregator(&two_venues);

    let err = aggregator
        .place_order("buy", Quantity::quote("100").unwrap(), "BTCUSDT")
        .await
        .unwrap_err();
    match &err {
        ExchangeError::OrderRejected { exchange, order, reason } => {
            assert_eq!(exchange, "bybit");
            assert_eq!(order, "BUY 100 quote BTCUSDT");
            assert!(reason.contains("Insufficient balance."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(two_venues.requests_matching(HttpMethod::Post, BINANCE_ORDER).is_empty());
    assert!(matches!(observer.events().last(), Some(RouteEvent::OrderRejected { .. })));
}

#[rstest]
#[monoio::test]
async fn test_every_order_requotes(two_venues: Arc<ScriptedTransport>) {
    let (aggregator, _) = scripted_aggregator(&two_venues);

    let first = aggregator
        .place_order("buy", Quantity::quote("10").unwrap(), "BTCUSDT")
        .await
        .unwrap();
    assert_eq!(first.exchange_id, "bybit");

    // Binance drops below Bybit between orders
    two_venues.respond_json(HttpMethod::Get, BINANCE_TICKER, 200, binance_ticker("BTCUSDT", "49900.00"));
    let second = aggregator
        .place_order("buy", Quantity::quote("10").unwrap(), "BTCUSDT")
        .await
        .unwrap();
    assert_eq!(second.exchange_id, "binance");
    assert_eq!(two_venues.requests_matching(HttpMethod::Get, BINANCE_TICKER).len(), 2);
}

#[rstest]
#[monoio::test]
async fn test_place_order_at_uses_given_quote(two_venues: Arc<ScriptedTransport>) {
    let (aggregator, _) = scripted_aggregator(&two_venues);
    let best = aggregator.get_best_price("BTCUSDT", "buy").await.unwrap();

    // Prices move, but the caller chose to act on the old quote
    two_venues.respond_json(HttpMethod::Get, BINANCE_TICKER, 200, binance_ticker("BTCUSDT", "1.00"));
    let order = OrderRequest::new(Side::Buy, Quantity::quote("25").unwrap(), "BTCUSDT");
    let result = aggregator.place_order_at(&best, &order).await.unwrap();

    assert_eq!(result.exchange_id, "bybit");
    assert_eq!(two_venues.requests_matching(HttpMethod::Get, BINANCE_TICKER).len(), 1);
}

#[rstest]
#[monoio::test]
async fn test_quotes_lists_every_venue(transport: Arc<ScriptedTransport>) {
    script_prices(&transport, "BTCUSDT", Some("50000"), None);
    let (aggregator, _) = scripted_aggregator(&transport);

    let quotes = aggregator.quotes("BTCUSDT").await;
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].as_ref().unwrap().exchange_id, "binance");
    assert!(matches!(quotes[1], Err(ExchangeError::Transport(_))));
}
