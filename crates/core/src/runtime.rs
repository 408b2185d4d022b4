//! monoio runtime wrapper
//!
//! All exchange I/O runs on one thread. Price queries to different venues are
//! interleaved on that thread rather than spread across cores.

use monoio::{LegacyDriver, RuntimeBuilder};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub thread_name: String,
    /// Log how long the whole run took
    pub enable_timing: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thread_name: "bestex-main".to_string(),
            enable_timing: true,
        }
    }
}

/// Single-threaded runtime used by the binaries
pub struct BestexRuntime {
    config: RuntimeConfig,
}

impl BestexRuntime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        info!("🚀 bestex runtime configured (thread: {})", config.thread_name);
        Self { config }
    }

    /// Build a runtime and drive `f` to completion on it
    pub fn start<F, Fut>(self, f: F) -> std::io::Result<Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future,
    {
        let mut runtime = RuntimeBuilder::<LegacyDriver>::new()
            .enable_timer()
            .build()?;

        let timer = self.config.enable_timing.then(|| crate::timing::PerfTimer::start(self.config.thread_name.clone()));
        let output = runtime.block_on(f());
        drop(timer);

        info!("⏹️  bestex runtime stopped");
        Ok(output)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl Default for BestexRuntime {
    fn default() -> Self {
        Self::new()
    }
}
