//! Property-based checks for selection, parsing and signing

use bestex_core::Fixed;
use bestex_exchanges::binance::QueryStringScheme;
use bestex_exchanges::signing::RequestSpec;
use bestex_exchanges::{ExchangeCredentials, ExchangeError, Quantity, Side, SigningScheme};
use bestex_router::select_best;
use proptest::prelude::*;

fn prices() -> impl Strategy<Value = Vec<Fixed>> {
    // narrow range, so ties are common
    prop::collection::vec((1i64..50).prop_map(Fixed::from_i64), 1..8)
}

fn indexed(prices: &[Fixed]) -> Vec<(usize, Fixed)> {
    prices.iter().copied().enumerate().collect()
}

proptest! {
    #[test]
    fn test_buy_is_minimum(prices in prices()) {
        let (index, best) = select_best(Side::Buy, indexed(&prices)).unwrap();
        prop_assert!(prices.iter().all(|p| best <= *p));
        prop_assert_eq!(prices[index], best);
    }

    #[test]
    fn test_sell_is_maximum(prices in prices()) {
        let (index, best) = select_best(Side::Sell, indexed(&prices)).unwrap();
        prop_assert!(prices.iter().all(|p| best >= *p));
        prop_assert_eq!(prices[index], best);
    }

    #[test]
    fn test_tie_goes_to_first_configured(prices in prices(), buy in any::<bool>()) {
        let side = if buy { Side::Buy } else { Side::Sell };
        let (index, best) = select_best(side, indexed(&prices)).unwrap();
        let first = prices.iter().position(|p| *p == best).unwrap();
        prop_assert_eq!(index, first);
    }

    #[test]
    fn test_failed_venues_never_win(prices in prices(), failed in prop::collection::vec(any::<bool>(), 8)) {
        let survivors: Vec<_> = indexed(&prices).into_iter().filter(|(i, _)| !failed[*i]).collect();
        match select_best(Side::Buy, survivors.clone()) {
            Some((index, _)) => prop_assert!(!failed[index]),
            None => prop_assert!(survivors.is_empty()),
        }
    }

    #[test]
    fn test_side_parse_ignores_case(mask in prop::collection::vec(any::<bool>(), 4)) {
        let word: String = "sell"
            .chars()
            .zip(&mask)
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
            .collect();
        prop_assert_eq!(word.parse::<Side>().unwrap(), Side::Sell);
    }

    #[test]
    fn test_unknown_side_rejected(word in "[a-z]{1,8}") {
        prop_assume!(word != "buy" && word != "sell");
        prop_assert_eq!(word.parse::<Side>(), Err(ExchangeError::InvalidSide(word.clone())));
    }

    #[test]
    fn test_positive_quantities_kept_verbatim(whole in 0u32..100_000, frac in "[0-9]{1,8}") {
        let text = format!("{whole}.{frac}");
        let is_positive = whole > 0 || frac.chars().any(|c| c != '0');
        match Quantity::base(&text) {
            Ok(quantity) => {
                prop_assert!(is_positive);
                prop_assert_eq!(quantity.amount(), text.as_str());
            }
            Err(e) => {
                prop_assert!(!is_positive);
                prop_assert!(matches!(e, ExchangeError::InvalidQuantity(_)));
            }
        }
    }

    #[test]
    fn test_signature_changes_with_any_param(value in "[A-Z0-9]{1,10}", other in "[A-Z0-9]{1,10}") {
        prop_assume!(value != other);
        let scheme = QueryStringScheme::default();
        let creds = ExchangeCredentials::new("key", "secret");
        let sign = |v: &str| {
            scheme
                .sign_at(RequestSpec::signed_get("/api/v3/account").param("symbol", v), &creds, 1)
                .unwrap()
                .signature
        };
        prop_assert_eq!(sign(&value), sign(&value));
        prop_assert_ne!(sign(&value), sign(&other));
    }
}
