//! Cancellation token with timed waits
//!
//! Every sleep on the fidget worker goes through [`CancelToken`], so a stop
//! request wakes it immediately and external predicates are re-checked at
//! least once per poll slice.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Default poll slice for cooperative sleeps
pub const POLL_SLICE: Duration = Duration::from_millis(100);

/// How a polled sleep ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed
    Elapsed,
    /// The token was cancelled
    Cancelled,
    /// The per-slice check asked to stop
    Stopped,
}

impl WaitOutcome {
    pub fn completed(&self) -> bool {
        *self == WaitOutcome::Elapsed
    }
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    cond: Condvar,
}

/// Shared stop signal; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal every waiter
    pub fn cancel(&self) {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        self.inner.cond.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Block for up to `timeout`; returns `true` if cancelled
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .inner
            .cond
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    /// Sleep `duration` in `slice` steps
    ///
    /// `keep_going` runs before every slice; returning `false` ends the
    /// sleep with [`WaitOutcome::Stopped`].
    pub fn sleep_polled(
        &self,
        duration: Duration,
        slice: Duration,
        mut keep_going: impl FnMut() -> bool,
    ) -> WaitOutcome {
        let deadline = Instant::now() + duration;
        let slice = slice.max(Duration::from_millis(1));

        loop {
            if self.is_cancelled() {
                return WaitOutcome::Cancelled;
            }
            let now = Instant::now();
            if now >= deadline {
                return WaitOutcome::Elapsed;
            }
            if !keep_going() {
                return WaitOutcome::Stopped;
            }
            if self.wait_timeout(slice.min(deadline - now)) {
                return WaitOutcome::Cancelled;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wait_times_out() {
        let token = CancelToken::new();
        let start = Instant::now();
        assert!(!token.wait_timeout(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_cancel_wakes_waiter() {
        let token = CancelToken::new();
        let remote = token.clone();

        let handle = thread::spawn(move || {
            let start = Instant::now();
            let cancelled = remote.wait_timeout(Duration::from_secs(10));
            (cancelled, start.elapsed())
        });

        thread::sleep(Duration::from_millis(20));
        token.cancel();

        let (cancelled, elapsed) = handle.join().unwrap();
        assert!(cancelled);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_sleep_polled_elapses() {
        let token = CancelToken::new();
        let mut checks = 0;
        let outcome = token.sleep_polled(
            Duration::from_millis(50),
            Duration::from_millis(10),
            || {
                checks += 1;
                true
            },
        );
        assert_eq!(outcome, WaitOutcome::Elapsed);
        assert!(checks >= 3);
    }

    #[test]
    fn test_sleep_polled_stops_within_one_slice() {
        let token = CancelToken::new();
        let start = Instant::now();
        let mut checks = 0;
        let outcome = token.sleep_polled(Duration::from_secs(10), POLL_SLICE, || {
            checks += 1;
            checks < 3
        });

        assert_eq!(outcome, WaitOutcome::Stopped);
        // Two full slices plus scheduling slack
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_sleep_on_cancelled_token_returns_immediately() {
        let token = CancelToken::new();
        token.cancel();
        let start = Instant::now();
        let outcome = token.sleep_polled(Duration::from_secs(5), POLL_SLICE, || true);
        assert_eq!(outcome, WaitOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
