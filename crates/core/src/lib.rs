//! # bestex core
//!
//! Runtime and value types shared by the exchange adapters and the router.
//!
//! ## Contents
//!
//! 1. **monoio runtime** - single-threaded async for all network I/O
//! 2. **Millisecond timestamps** - fresh per signed request, never reused
//! 3. **Exact decimals** - prices and quantities never pass through `f64`
//! 4. **Unified logging** - tracing subscriber (or ftlog) set up once
//! 5. **Client order ids** - nanoid-based, within exchange length limits

pub mod runtime;
pub mod timing;
pub mod fixed;
pub mod logging;
pub mod id_gen;

// Re-export commonly used items
pub use runtime::BestexRuntime;
pub use timing::{millis, nanos, PerfTimer, Timestamp};
pub use fixed::{Fixed, FixedError};
pub use logging::init_logging;
pub use id_gen::{generate_client_order_id, ClientOrderId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::runtime::{BestexRuntime, RuntimeConfig};
    pub use crate::timing::{millis, nanos, PerfTimer, Timestamp};
    pub use crate::fixed::{Fixed, FixedError};
    pub use crate::id_gen::{generate_client_order_id, ClientOrderId};
    pub use crate::logging::init_logging;

    // Common external types
    pub use monoio;
    pub use serde::{Deserialize, Serialize};
    pub use chrono::{DateTime, Utc};
}
