//! Time sources, cancellation and rate-limited tickers

pub mod cancel;
pub mod clock;
pub mod ticker;

pub use cancel::{CancelToken, WaitOutcome, POLL_SLICE};
pub use clock::{Clock, MonotonicClock};
pub use ticker::{ActionTick, Interval, Tick, Ticker, TickerGroup};

use std::thread;
use std::time::Duration;

/// Plain blocking sleep for `secs` seconds; non-positive values return at once
pub fn sleep_secs(secs: f64) {
    if secs > 0.0 {
        thread::sleep(Duration::from_secs_f64(secs));
    }
}
