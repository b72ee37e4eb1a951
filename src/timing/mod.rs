//! Injectable time sources and the deferred-action queue.
//!
//! Every driver reads time through [`TimeSource`] so frame timing can be
//! stepped by hand in tests instead of waiting on a real display refresh.

mod deferred;

pub use deferred::DeferredQueue;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Monotonic time, measured from an arbitrary fixed origin.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Duration;
}

/// Monotonic time read from tokio's clock.
///
/// Follows `tokio::time::pause()` in tests; outside a runtime it reads the
/// system monotonic clock.
#[derive(Debug, Clone)]
pub struct SystemTime {
    origin: Instant,
}

impl SystemTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced time source. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    micros: Arc<AtomicU64>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.micros.fetch_add(step.as_micros() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute reading. Never moves backwards.
    pub fn set(&self, at: Duration) {
        self.micros.fetch_max(at.as_micros() as u64, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}
