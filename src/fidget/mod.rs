//! Background idle behavior
//!
//! While a task runs, a single worker drifts the cursor by a few pixels,
//! taps harmless keys and optionally keeps LAlt held, all on quantized
//! delays. Foreground motion raises the mouse lock in [`FidgetState`] and the
//! worker skips its drift step until the lock drops.

pub mod drift;
pub mod modifier;
pub mod state;
pub mod worker;

pub use drift::Drift;
pub use modifier::{HoldState, ModifierHold, Transition};
pub use state::{FidgetState, MouseLockGuard};
pub use worker::FidgetWorker;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::error::InputError;
use crate::host::Spawner;
use crate::motion::MotionExecutor;
use crate::timing::CancelToken;

/// Longest wait for a stopped worker to finish before a restart
const RESTART_TIMEOUT: Duration = Duration::from_secs(2);

/// Owns the lifecycle of the fidget worker
#[derive(Debug)]
pub struct FidgetScheduler {
    executor: Arc<MotionExecutor>,
    settings: Settings,
    candidates: Vec<u16>,
    token: CancelToken,
    /// Raised by the worker once its exit cleanup is done
    finished: CancelToken,
}

/// Raises the finished latch when the worker job is dropped, whether it ran
/// to completion, panicked or never ran
struct FinishGuard(CancelToken);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl FidgetScheduler {
    /// Resolve the candidate keys up front so a bad key name fails here
    /// rather than inside the worker
    pub fn new(executor: Arc<MotionExecutor>, settings: Settings) -> Result<Self, InputError> {
        let candidates = settings.keys.fidget_candidates()?;
        let token = CancelToken::new();
        token.cancel();
        let finished = CancelToken::new();
        finished.cancel();

        Ok(Self {
            executor,
            settings,
            candidates,
            token,
            finished,
        })
    }

    pub fn candidates(&self) -> &[u16] {
        &self.candidates
    }

    pub fn state(&self) -> &Arc<FidgetState> {
        self.executor.state()
    }

    /// Token of the current run; cancelled when no worker is running
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Submit a fresh worker, stopping any previous one
    ///
    /// The previous worker's exit cleanup (LAlt release) completes before the
    /// new one is submitted. Returns `Ok(false)` when the worker is disabled
    /// in settings.
    pub fn start(&mut self, spawner: &dyn Spawner) -> io::Result<bool> {
        if !self.settings.fidget.enabled {
            log::info!("fidget action disabled in settings");
            return Ok(false);
        }

        self.stop();
        if !self.finished.wait_timeout(RESTART_TIMEOUT) {
            log::warn!("previous fidget worker still running after {RESTART_TIMEOUT:?}");
        }

        let token = CancelToken::new();
        let finished = CancelToken::new();
        self.token = token.clone();
        self.finished = finished.clone();

        let executor = self.executor.clone();
        let settings = self.settings.clone();
        let candidates = self.candidates.clone();

        // Moved into the job so a dropped, never-run job also raises it
        let guard = FinishGuard(finished);
        let submitted = spawner.submit(Box::new(move || {
            let _finished = guard;
            FidgetWorker::new(executor, &settings, candidates, token).run();
        }));
        if let Err(e) = submitted {
            self.token.cancel();
            self.finished.cancel();
            return Err(e);
        }
        Ok(true)
    }

    /// Signal the worker; it exits within one poll slice
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Block until the current worker has finished its exit cleanup
    ///
    /// Returns `false` on timeout.
    pub fn wait_finished(&self, timeout: Duration) -> bool {
        self.finished.wait_timeout(timeout)
    }
}

impl Drop for FidgetScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
