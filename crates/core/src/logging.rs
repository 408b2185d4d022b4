//! Unified logging setup
//!
//! Library code only emits `tracing` events. Binaries call [`init_logging`]
//! once to install a subscriber; `RUST_LOG` controls the filter.
//!
//! With the `ftlog` feature no subscriber is installed. `tracing` is built
//! with its `log` feature instead, so every event becomes a `log` record and
//! reaches ftlog.

use std::sync::Once;
#[cfg(not(feature = "ftlog"))]
use tracing_subscriber::{EnvFilter, FmtSubscriber};

static INIT: Once = Once::new();

/// Install the process-wide log sink. Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(feature = "ftlog")]
        {
            init_ftlog();
        }

        #[cfg(not(feature = "ftlog"))]
        {
            init_tracing();
        }
    });
}

#[cfg(feature = "ftlog")]
fn init_ftlog() {
    match ftlog::builder()
        .max_log_level(ftlog::LevelFilter::Info)
        .bounded(100_000, false)
        .utc()
        .try_init()
    {
        // Logger lives for the whole process
        Ok(guard) => std::mem::forget(guard),
        Err(e) => eprintln!("ftlog init failed: {e}"),
    }

    tracing::info!("📝 Initialized ftlog logging");
}

#[cfg(not(feature = "ftlog"))]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    // A test harness may already have installed one
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return;
    }

    tracing::info!("📝 Initialized tracing logging");
}

/// Log how long an operation took, in μs below a millisecond
#[macro_export]
macro_rules! log_latency {
    ($operation:expr, $duration_micros:expr) => {
        if $duration_micros < 1000 {
            tracing::debug!("⚡ {} completed in {}μs", $operation, $duration_micros);
        } else {
            tracing::info!("⚡ {} completed in {:.3}ms", $operation, $duration_micros as f64 / 1000.0);
        }
    };
}

/// Log a routed order event: action, venue, side, quantity, symbol
#[macro_export]
macro_rules! log_order {
    ($action:expr, $exchange:expr, $side:expr, $quantity:expr, $symbol:expr) => {
        tracing::info!("📋 ORDER {} on {}: {} {} {}", $action, $exchange, $side, $quantity, $symbol);
    };
}

#[macro_export]
macro_rules! log_error {
    ($operation:expr, $error:expr) => {
        tracing::error!("❌ {} failed: {}", $operation, $error);
    };
}
