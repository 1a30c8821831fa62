//! The fidget loop body
//!
//! One round: modifier-hold check, drift step, one idle key press, long
//! quantized idle sleep. Every wait goes through the cancel token and
//! re-checks the run condition each slice; the long sleep also re-checks the
//! modifier.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::{AfkSettings, Settings};
use crate::host::Host;
use crate::input::keys::VK_LMENU;
use crate::motion::MotionExecutor;
use crate::stealth::Humanizer;
use crate::timing::{CancelToken, WaitOutcome, POLL_SLICE};

use super::drift::Drift;
use super::modifier::{ModifierHold, Transition};
use super::state::FidgetState;

/// Settle after pressing the modifier
const ENGAGE_SETTLE_SECS: f64 = 0.1;
/// Delay before re-pressing the modifier on return to context
const RESUME_DELAY_SECS: f64 = 0.2;

pub struct FidgetWorker<R: Rng = StdRng> {
    executor: Arc<MotionExecutor>,
    afk: AfkSettings,
    key_presses: bool,
    poll_slice: Duration,
    candidates: Vec<u16>,
    drift: Drift,
    modifier: ModifierHold,
    humanizer: Humanizer<R>,
    token: CancelToken,
}

impl FidgetWorker {
    pub fn new(
        executor: Arc<MotionExecutor>,
        settings: &Settings,
        candidates: Vec<u16>,
        token: CancelToken,
    ) -> Self {
        Self::with_rng(executor, settings, candidates, token, StdRng::from_entropy())
    }
}

impl<R: Rng> FidgetWorker<R> {
    pub fn with_rng(
        executor: Arc<MotionExecutor>,
        settings: &Settings,
        candidates: Vec<u16>,
        token: CancelToken,
        rng: R,
    ) -> Self {
        Self {
            executor,
            afk: settings.afk.clone(),
            key_presses: settings.fidget.key_presses,
            poll_slice: Duration::from_millis(settings.fidget.poll_slice_ms)
                .clamp(Duration::from_millis(1), POLL_SLICE),
            candidates,
            drift: Drift::new(),
            modifier: ModifierHold::new(),
            humanizer: Humanizer::with_rng(rng),
            token,
        }
    }

    fn host(&self) -> &Arc<dyn Host> {
        self.executor.host()
    }

    fn state(&self) -> &Arc<FidgetState> {
        self.executor.state()
    }

    pub fn drift(&self) -> Drift {
        self.drift
    }

    pub fn modifier(&self) -> ModifierHold {
        self.modifier
    }

    /// Task active, no exit signal, not stopped
    pub fn should_run(&self) -> bool {
        let host = self.host();
        host.task_active() && !host.cancellation_requested() && !self.token.is_cancelled()
    }

    /// Short wait that ends within one poll slice of a stop or exit signal
    fn pause(&self, secs: f64) -> WaitOutcome {
        if !self.should_run() {
            return WaitOutcome::Stopped;
        }
        if secs <= 0.0 {
            return WaitOutcome::Elapsed;
        }
        self.token
            .sleep_polled(Duration::from_secs_f64(secs), self.poll_slice, || {
                self.should_run()
            })
    }

    /// Spoofed key event when foregrounded, posted key event otherwise
    pub fn send_key(&self, vk: u16, down: bool) -> bool {
        let host = self.host();
        if host.is_foreground() {
            if let Some(injector) = self.executor.injector() {
                if injector.send_key(vk, down) {
                    return true;
                }
                log::warn!("[keyboard spoof] VK={vk:#04x} down={down} failed, falling back to posted key");
            }
        }
        host.post_key(vk, down)
    }

    /// Advance the held-LAlt state machine by at most one transition
    pub fn check_modifier(&mut self) {
        let enabled = self.state().hold_lalt();
        let host = self.host().clone();
        let Some(transition) = self.modifier.next(enabled, || host.in_expected_context()) else {
            return;
        };

        match transition {
            Transition::Engage => {
                log::info!("[LAlt hold] engaged: pressing LAlt");
                self.send_key(VK_LMENU, true);
                self.pause(ENGAGE_SETTLE_SECS);
            }
            Transition::Suspend => {
                let wait = self.humanizer.quantized_delay();
                self.pause(wait);
                log::info!("[LAlt hold] paused: left the expected context, releasing LAlt");
                self.send_key(VK_LMENU, false);
            }
            Transition::Resume => {
                log::info!("[LAlt hold] resumed: back in context, pressing LAlt");
                self.pause(RESUME_DELAY_SECS);
                self.send_key(VK_LMENU, true);
            }
            Transition::Disengage { release } => {
                log::info!("[LAlt hold] stopped: feature disabled, releasing LAlt");
                if release {
                    self.send_key(VK_LMENU, false);
                }
            }
        }

        self.commit(transition);
    }

    fn commit(&mut self, transition: Transition) {
        self.modifier.commit(transition);
        self.state()
            .set_modifier_flags(self.modifier.held(), self.modifier.needs_resync());
    }

    /// One idle drift nudge; `None` when drift is suppressed
    pub fn jitter_step(&mut self) -> Option<(i32, i32)> {
        let state = self.state();
        if state.mouse_locked() || state.skip_jitter() || !self.afk.mouse_jitter {
            return None;
        }

        if self.afk.clamp_jitter_to_window {
            self.executor.ensure_cursor_in_window();
        }

        let step = self.drift.next_step(self.humanizer.rng());
        self.executor.nudge_if_in_window(step.0, step.1);
        self.drift.apply(step);
        log::trace!("drift step {step:?}, offset {:?}", self.drift.offset());
        Some(step)
    }

    /// Press one candidate key with a human hold, then a quantized pause
    pub fn random_key_press(&mut self) -> Option<u16> {
        if !self.key_presses {
            return None;
        }
        let vk = *self.candidates.choose(self.humanizer.rng())?;
        let hold = self.humanizer.key_hold();
        let after = self.humanizer.quantized_delay();

        // The key-up goes out even when the hold is cut short
        self.send_key(vk, true);
        self.pause(hold);
        self.send_key(vk, false);
        self.pause(after);
        Some(vk)
    }

    /// Long idle sleep, re-checking the run condition and the modifier every
    /// poll slice
    pub fn idle_sleep(&mut self) -> WaitOutcome {
        let secs = self.humanizer.idle_interval();
        let token = self.token.clone();
        let slice = self.poll_slice;
        token.sleep_polled(Duration::from_secs_f64(secs), slice, || {
            if !self.should_run() {
                return false;
            }
            self.check_modifier();
            true
        })
    }

    /// Run until the task ends or the worker is stopped
    pub fn run(mut self) {
        log::info!("fidget action started");

        while self.should_run() {
            if self.host().is_paused() {
                self.token.wait_timeout(self.poll_slice);
                continue;
            }

            self.check_modifier();
            self.jitter_step();
            self.random_key_press();
            if !self.idle_sleep().completed() {
                break;
            }
        }

        // Never leave LAlt physically down behind us
        if let Some(transition) = self.modifier.next(false, || true) {
            if transition == (Transition::Disengage { release: true }) {
                self.send_key(VK_LMENU, false);
            }
            self.commit(transition);
        }

        log::info!("fidget action stopped");
    }
}
