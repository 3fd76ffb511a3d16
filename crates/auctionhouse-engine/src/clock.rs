//! Request-time source.
//!
//! Deadlines are checked lazily against the time a request arrives, so the
//! registry only needs "now" in unix seconds.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Current time in unix seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

/// Wall clock via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Manually driven clock for tests and simulations.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, timestamp: u64) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    #[must_use]
    pub fn get(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl Default for ManualClock {
    /// 2024-01-01 00:00:00 UTC.
    fn default() -> Self {
        Self::new(1_704_067_200)
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> u64 {
        self.get()
    }
}
