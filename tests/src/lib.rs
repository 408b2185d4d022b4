//! Cross-crate tests for bestex
//!
//! Everything runs against [`ScriptedTransport`](bestex_exchanges::http::mock::ScriptedTransport)
//! or a mockall transport; nothing here touches a real exchange. Live checks
//! live in `bin/check_venues.rs` and the examples.


#[cfg(test)]
mod routing_tests;
#[cfg(test)]
mod signing_tests;
#[cfg(test)]
mod property_tests;
