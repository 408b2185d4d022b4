//! Wall-clock timestamps and call timing
//!
//! Exchanges authenticate requests against a millisecond Unix timestamp, so
//! everything here is anchored to `SystemTime` rather than a monotonic clock.

use std::time::{SystemTime, UNIX_EPOCH};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time with nanosecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch
    pub nanos: u64,
}

impl Timestamp {
    pub fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self { nanos: millis.saturating_mul(1_000_000) }
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        Self { nanos: nanos() }
    }

    /// Milliseconds since Unix epoch, the unit exchanges sign with
    pub fn as_millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        let secs = self.nanos / 1_000_000_000;
        let nsecs = (self.nanos % 1_000_000_000) as u32;
        DateTime::from_timestamp(secs as i64, nsecs).unwrap_or_else(Utc::now)
    }

    pub fn elapsed_nanos(&self) -> u64 {
        nanos().saturating_sub(self.nanos)
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed_nanos() / 1_000
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_nanos() / 1_000_000
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        let nanos = dt.timestamp() as u64 * 1_000_000_000 + dt.timestamp_subsec_nanos() as u64;
        Self { nanos }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_datetime().format("%Y-%m-%d %H:%M:%S%.3f UTC"))
    }
}

/// Nanoseconds since Unix epoch
#[inline]
pub fn nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Milliseconds since Unix epoch
#[inline]
pub fn millis() -> u64 {
    nanos() / 1_000_000
}

/// Logs how long a named operation took when dropped
pub struct PerfTimer {
    start: Timestamp,
    name: String,
}

impl PerfTimer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Timestamp::now(),
            name: name.into(),
        }
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.start.elapsed_micros()
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.start.elapsed_millis()
    }

    pub fn log_elapsed(&self) {
        let micros = self.elapsed_micros();
        if micros < 1000 {
            tracing::debug!("⏱️  {} took {}μs", self.name, micros);
        } else {
            tracing::debug!("⏱️  {} took {:.3}ms", self.name, micros as f64 / 1000.0);
        }
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        self.log_elapsed();
    }
}
