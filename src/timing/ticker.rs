//! Rate-limited action gates
//!
//! A [`Ticker`] owns an action and decides, on every [`Ticker::fire_attempt`],
//! whether enough time has passed since the last firing. Callers that trigger
//! the same action by hand use [`Ticker::touch`] or
//! [`Ticker::arm_next_as_no_op`] so the ticker does not double-fire.

use std::time::Duration;

use rand::Rng;

use super::clock::{Clock, MonotonicClock};

/// Sentinel `last_fire` meaning "fire on the next attempt"
const NEVER_FIRED: f64 = -1.0;

/// Base interval, fixed or read fresh on every attempt
pub enum Interval {
    Fixed(f64),
    Dynamic(Box<dyn Fn() -> f64 + Send>),
}

impl Interval {
    /// Interval provider re-evaluated on every attempt
    pub fn dynamic(provider: impl Fn() -> f64 + Send + 'static) -> Self {
        Interval::Dynamic(Box::new(provider))
    }

    /// Current base interval in seconds
    pub fn secs(&self) -> f64 {
        match self {
            Interval::Fixed(secs) => *secs,
            Interval::Dynamic(provider) => provider(),
        }
    }
}

impl From<f64> for Interval {
    fn from(secs: f64) -> Self {
        Interval::Fixed(secs)
    }
}

impl From<Duration> for Interval {
    fn from(duration: Duration) -> Self {
        Interval::Fixed(duration.as_secs_f64())
    }
}

impl std::fmt::Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Fixed(secs) => f.debug_tuple("Fixed").field(secs).finish(),
            Interval::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Operations shared by tickers and ticker groups
///
/// Only `fire_attempt` is mandatory; members that have no notion of a clock
/// ignore the others.
pub trait Tick {
    /// Maybe run the action; returns whether it ran
    fn fire_attempt(&mut self) -> bool;

    /// Make the next attempt fire immediately
    fn reset(&mut self) {}

    /// Start a full cooldown from now without firing
    fn touch(&mut self) {}

    /// Make the next attempt only resync the clock
    fn arm_next_as_no_op(&mut self) {}
}

/// Time-gated action
pub struct Ticker<C: Clock = MonotonicClock> {
    action: Box<dyn FnMut() + Send>,
    interval: Interval,
    random_range: (f64, f64),
    last_fire: f64,
    armed: bool,
    clock: C,
}

impl Ticker {
    /// Create a ticker on the monotonic clock
    pub fn new(action: impl FnMut() + Send + 'static, interval: impl Into<Interval>) -> Self {
        Self::with_clock(action, interval, MonotonicClock::new())
    }
}

impl<C: Clock> Ticker<C> {
    /// Create a ticker reading time from `clock`
    pub fn with_clock(
        action: impl FnMut() + Send + 'static,
        interval: impl Into<Interval>,
        clock: C,
    ) -> Self {
        Self {
            action: Box::new(action),
            interval: interval.into(),
            random_range: (1.0, 1.0),
            last_fire: NEVER_FIRED,
            armed: false,
            clock,
        }
    }

    /// Scale each interval by a uniform factor from `range`
    pub fn with_random_range(mut self, range: (f64, f64)) -> Self {
        self.random_range = if range.0 <= range.1 {
            range
        } else {
            (range.1, range.0)
        };
        self
    }

    /// Time of the last firing or resync, `None` after a reset
    pub fn last_fire(&self) -> Option<f64> {
        (self.last_fire >= 0.0).then_some(self.last_fire)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn effective_interval(&self) -> f64 {
        let (lo, hi) = self.random_range;
        let multiplier = if lo < hi {
            rand::thread_rng().gen_range(lo..=hi)
        } else {
            lo
        };
        self.interval.secs() * multiplier
    }

    /// Run the action if the interval has elapsed
    ///
    /// An armed ticker consumes this attempt to record the current time and
    /// never fires on it.
    pub fn fire_attempt(&mut self) -> bool {
        let now = self.clock.now();

        if self.armed {
            self.armed = false;
            self.last_fire = now;
            return false;
        }

        let interval = self.effective_interval();
        if self.last_fire < 0.0 || now - self.last_fire >= interval {
            self.last_fire = now;
            (self.action)();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.last_fire = NEVER_FIRED;
    }

    pub fn touch(&mut self) {
        self.last_fire = self.clock.now();
    }

    pub fn arm_next_as_no_op(&mut self) {
        self.armed = true;
    }
}

impl<C: Clock> Tick for Ticker<C> {
    fn fire_attempt(&mut self) -> bool {
        Ticker::fire_attempt(self)
    }

    fn reset(&mut self) {
        Ticker::reset(self)
    }

    fn touch(&mut self) {
        Ticker::touch(self)
    }

    fn arm_next_as_no_op(&mut self) {
        Ticker::arm_next_as_no_op(self)
    }
}

impl<C: Clock> std::fmt::Debug for Ticker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("interval", &self.interval)
            .field("random_range", &self.random_range)
            .field("last_fire", &self.last_fire)
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

/// Ungated action, fires on every attempt
pub struct ActionTick<F>(pub F);

impl<F: FnMut()> Tick for ActionTick<F> {
    fn fire_attempt(&mut self) -> bool {
        (self.0)();
        true
    }
}

/// Broadcasts every operation to its members in order
#[derive(Default)]
pub struct TickerGroup {
    members: Vec<Box<dyn Tick + Send>>,
}

impl TickerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, member: impl Tick + Send + 'static) -> Self {
        self.push(member);
        self
    }

    pub fn push(&mut self, member: impl Tick + Send + 'static) {
        self.members.push(Box::new(member));
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Tick for TickerGroup {
    /// Attempts every member; true if any fired
    fn fire_attempt(&mut self) -> bool {
        self.members
            .iter_mut()
            .fold(false, |fired, member| member.fire_attempt() | fired)
    }

    fn reset(&mut self) {
        self.members.iter_mut().for_each(|m| m.reset());
    }

    fn touch(&mut self) {
        self.members.iter_mut().for_each(|m| m.touch());
    }

    fn arm_next_as_no_op(&mut self) {
        self.members.iter_mut().for_each(|m| m.arm_next_as_no_op());
    }
}
