//! Signatures as they appear on the wire, recomputed independently

use crate::support::*;
use bestex_exchanges::binance::QueryStringScheme;
use bestex_exchanges::bybit::HeaderScheme;
use bestex_exchanges::http::mock::ScriptedTransport;
use bestex_exchanges::http::HttpMethod;
use bestex_exchanges::signing::{hmac_sha256_hex, RequestSpec};
use bestex_exchanges::{Exchange, ExchangeCredentials, OrderRequest, Quantity, Side, SigningScheme};
use rstest::*;
use std::sync::Arc;

#[test]
fn test_binance_documented_vector() {
    // HMAC example from the Binance spot API documentation
    let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    let payload = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
    assert_eq!(
        hmac_sha256_hex(secret, payload).unwrap(),
        "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
    );
}

#[rstest]
#[case(Box::new(QueryStringScheme::default()) as Box<dyn SigningScheme>)]
#[case(Box::new(HeaderScheme::default()) as Box<dyn SigningScheme>)]
fn test_schemes_are_deterministic(#[case] scheme: Box<dyn SigningScheme>) {
    let creds = ExchangeCredentials::new("key", "secret");
    let spec = || RequestSpec::signed_post("/order").param("symbol", "BTCUSDT").param("qty", "1");

    let a = scheme.sign_at(spec(), &creds, 1_700_000_000_000).unwrap();
    let b = scheme.sign_at(spec(), &creds, 1_700_000_000_000).unwrap();
    assert_eq!(a.signature, b.signature);
    assert_eq!(a.body, b.body);

    let other_secret = scheme
        .sign_at(spec(), &ExchangeCredentials::new("key", "secret2"), 1_700_000_000_000)
        .unwrap();
    assert_ne!(a.signature, other_secret.signature);
}

#[test]
fn test_schemes_differ_for_same_request() {
    let creds = ExchangeCredentials::new("key", "secret");
    let spec = RequestSpec::signed_post("/order").param("symbol", "BTCUSDT");

    let binance = QueryStringScheme::default().sign_at(spec.clone(), &creds, 5).unwrap();
    let bybit = HeaderScheme::default().sign_at(spec, &creds, 5).unwrap();
    assert_ne!(binance.signature, bybit.signature);
    assert_ne!(binance.body, bybit.body);
}

#[monoio::test]
async fn test_binance_wire_signature_verifies() {
    let transport = Arc::new(ScriptedTransport::new());
    script_fills(&transport);
    let client = &scripted_clients(&transport)[0];

    let order = OrderRequest::new(Side::Buy, Quantity::quote("100").unwrap(), "BTCUSDT");
    client.place_order(&order).await.unwrap();

    let request = &transport.requests_matching(HttpMethod::Post, BINANCE_ORDER)[0];
    let body = request.body.clone().unwrap();
    let (payload, signature) = body.rsplit_once("&signature=").unwrap();
    assert_eq!(signature, hmac_sha256_hex("binance_secret", payload).unwrap());
    assert!(payload.contains("recvWindow=5000"));
    assert_eq!(request.header("X-MBX-APIKEY"), Some("binance_key"));
}

#[monoio::test]
async fn test_bybit_wire_signature_verifies() {
    let transport = Arc::new(ScriptedTransport::new());
    script_fills(&transport);
    let client = &scripted_clients(&transport)[1];

    let order = OrderRequest::new(Side::Sell, Quantity::base("0.5").unwrap(), "ETHUSDT");
    client.place_order(&order).await.unwrap();

    let request = &transport.requests_matching(HttpMethod::Post, BYBIT_ORDER)[0];
    let timestamp = request.header("X-BAPI-TIMESTAMP").unwrap();
    let recv_window = request.header("X-BAPI-RECV-WINDOW").unwrap();
    let body = request.body.as_deref().unwrap();

    let prehash = format!("{timestamp}bybit_key{recv_window}{body}");
    assert_eq!(
        request.header("X-BAPI-SIGN"),
        Some(hmac_sha256_hex("bybit_secret", &prehash).unwrap().as_str())
    );
}

#[monoio::test]
async fn test_public_price_queries_carry_no_credentials() {
    let transport = Arc::new(ScriptedTransport::new());
    script_prices(&transport, "BTCUSDT", Some("1"), Some("2"));
    for client in scripted_clients(&transport) {
        client.get_price("BTCUSDT").await.unwrap();
    }

    for request in transport.requests() {
        assert!(!request.url.contains("signature="));
        assert!(request.headers.iter().all(|(name, _)| !name.starts_with("X-")));
    }
}
