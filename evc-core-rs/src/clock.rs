//! Time sources
//!
//! The supervisor timestamps charging attempts through a [`Clock`] so the
//! confirmation window can be driven deterministically in tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::types::{unix_millis, TimestampMs};

/// Source of wall-clock time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> TimestampMs;
}

/// Wall clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> TimestampMs {
        unix_millis()
    }
}

/// Manually advanced clock for testing and simulation
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock reading `start` milliseconds
    pub fn new(start: TimestampMs) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start)),
        }
    }

    /// Advance time by `millis`
    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, millis: TimestampMs) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> TimestampMs {
        self.millis.load(Ordering::SeqCst)
    }
}
