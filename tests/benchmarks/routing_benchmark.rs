//! Benchmarks for the CPU-bound parts of a routing round
//!
//! - Request signing for both schemes
//! - Best-price selection
//! - Price decoding from exchange JSON

use bestex_core::Fixed;
use bestex_exchanges::binance::QueryStringScheme;
use bestex_exchanges::bybit::HeaderScheme;
use bestex_exchanges::signing::RequestSpec;
use bestex_exchanges::{ExchangeCredentials, Side, SigningScheme};
use bestex_router::select_best;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn order_spec() -> RequestSpec {
    RequestSpec::signed_post("/order")
        .param("symbol", "BTCUSDT")
        .param("side", "BUY")
        .param("type", "MARKET")
        .param("quoteOrderQty", "100")
        .param("newClientOrderId", "BX-1700000000000-abcdefghijkl")
}

fn bench_signing(c: &mut Criterion) {
    let creds = ExchangeCredentials::new("benchmark_api_key", "benchmark_secret_key");
    let binance = QueryStringScheme::default();
    let bybit = HeaderScheme::default();

    let mut group = c.benchmark_group("signing");
    group.bench_function("binance_query_hmac", |b| {
        b.iter(|| binance.sign_at(black_box(order_spec()), &creds, 1_700_000_000_000))
    });
    group.bench_function("bybit_header_hmac", |b| {
        b.iter(|| bybit.sign_at(black_box(order_spec()), &creds, 1_700_000_000_000))
    });
    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let prices: Vec<(usize, Fixed)> = (0..16)
        .map(|i| (i, Fixed::from_i64(50_000 - (i as i64 * 7) % 13)))
        .collect();

    c.bench_function("select_best_16", |b| {
        b.iter(|| select_best(Side::Buy, black_box(prices.iter().copied())))
    });
}

fn bench_price_decode(c: &mut Criterion) {
    let body = json!({"symbol": "BTCUSDT", "price": "64123.45000000"});
    c.bench_function("fixed_from_json", |b| b.iter(|| Fixed::from_json(black_box(&body["price"]))));
}

criterion_group!(benches, bench_signing, bench_selection, bench_price_decode);
criterion_main!(benches);
