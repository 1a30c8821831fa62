//! Time sources in seconds
//!
//! Tickers read time through [`Clock`] so tests can drive the timeline.

use std::time::Instant;

/// Monotonic time in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall-clock monotonic source anchored at construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}
