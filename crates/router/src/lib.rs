//! # bestex router
//!
//! Asks every configured exchange for a price at the same time, picks the
//! best one for the requested side and sends the market order there.
//!
//! - Buy goes to the strictly lowest price, sell to the strictly highest
//! - Ties keep the exchange configured first
//! - Exchanges that fail to quote are reported and skipped
//! - Nothing is cached between calls

pub mod selection;
pub mod observer;
pub mod aggregator;

pub use aggregator::{Aggregator, BestQuote};
pub use observer::{RouteObserver, SilentObserver, TracingObserver};
pub use selection::select_best;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregator::{Aggregator, BestQuote};
    pub use crate::observer::{RouteObserver, SilentObserver, TracingObserver};
    pub use bestex_exchanges::prelude::*;
}
