//! Human timing distributions for anti-detection
//!
//! The game samples input on a coarse script tick (about 0.3 s). Delays here
//! cluster just below the tick boundaries instead of being uniform or round,
//! so neither "too exact" nor "too random" stands out in the input log.

use rand::rngs::ThreadRng;
use rand::Rng;

/// Short delays clustered near the 0.0 / 0.3 / 0.6 / 0.9 s grid
pub const QUANTIZED_BANDS: [(f64, f64); 4] =
    [(0.005, 0.02), (0.20, 0.28), (0.50, 0.58), (0.80, 0.88)];

/// Long idle sleeps around 3.0/3.3, 4.2/4.5 and 5.4/5.7 s
pub const IDLE_BANDS: [(f64, f64); 3] = [(3.05, 3.20), (4.25, 4.40), (5.45, 5.60)];

/// Key hold range for idle key presses (seconds)
const MIN_KEY_HOLD: f64 = 0.02;
const MAX_KEY_HOLD: f64 = 0.09;

/// Default click hold range when the caller gives none
const MIN_CLICK_HOLD: f64 = 0.06;
const MAX_CLICK_HOLD: f64 = 0.13;

/// Floor of a spoofed click hold
const MIN_SPOOFED_HOLD: f64 = 0.03;

/// Timing of one humanized click, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTiming {
    /// Wait before moving
    pub pre: f64,
    /// Button hold
    pub hold: f64,
    /// Wait after release
    pub after: f64,
}

/// Random source for every humanized delay
pub struct Humanizer<R: Rng = ThreadRng> {
    rng: R,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Humanizer {
    /// Create a humanizer on the thread-local generator
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl<R: Rng> Humanizer<R> {
    /// Create a humanizer on a caller-supplied generator
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Access the underlying generator
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    fn pick_band(&mut self, bands: &[(f64, f64)]) -> f64 {
        let (lo, hi) = bands[self.rng.gen_range(0..bands.len())];
        self.rng.gen_range(lo..=hi)
    }

    /// Short delay from one of the four quantized bands
    pub fn quantized_delay(&mut self) -> f64 {
        self.pick_band(&QUANTIZED_BANDS)
    }

    /// Long idle interval between fidget rounds
    pub fn idle_interval(&mut self) -> f64 {
        self.pick_band(&IDLE_BANDS)
    }

    /// Hold time of an idle key press
    pub fn key_hold(&mut self) -> f64 {
        self.rng.gen_range(MIN_KEY_HOLD..=MAX_KEY_HOLD)
    }

    /// Humanize the caller's click parameters
    ///
    /// Zero or negative inputs mean "pick a natural value".
    pub fn click_timing(&mut self, pre: f64, hold: f64, after: f64) -> ClickTiming {
        let pre = if pre <= 0.0 {
            0.0
        } else {
            pre + self.rng.gen_range(0.05..=0.15)
        };
        let hold = if hold <= 0.0 {
            self.rng.gen_range(MIN_CLICK_HOLD..=MAX_CLICK_HOLD)
        } else {
            (hold + self.rng.gen_range(0.0..=0.13)).max(0.05)
        };
        let after = if after <= 0.0 {
            self.rng.gen_range(0.01..=0.04)
        } else {
            after + self.rng.gen_range(0.02..=0.08)
        };

        ClickTiming { pre, hold, after }
    }

    /// Extra variance on the hold of a hardware-spoofed click
    pub fn spoofed_hold(&mut self, hold: f64) -> f64 {
        (hold + self.rng.gen_range(-0.01..=0.02)).max(MIN_SPOOFED_HOLD)
    }

    /// Pause after a trajectory move lands, before pressing
    pub fn settle_after_trajectory(&mut self) -> f64 {
        self.rng.gen_range(0.05..=0.08)
    }

    /// Pause after a direct cursor jump, before pressing
    pub fn settle_after_jump(&mut self) -> f64 {
        self.rng.gen_range(0.08..=0.12)
    }

    /// `timeout` scaled by a uniform factor from `range`
    pub fn scaled(&mut self, timeout: f64, range: (f64, f64)) -> f64 {
        let (lo, hi) = if range.0 <= range.1 {
            range
        } else {
            (range.1, range.0)
        };
        timeout * self.uniform(lo, hi)
    }

    /// Uniform value in `[lo, hi]`
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_bands(value: f64, bands: &[(f64, f64)]) -> bool {
        bands.iter().any(|&(lo, hi)| value >= lo && value <= hi)
    }

    #[test]
    fn test_quantized_delay_stays_in_bands() {
        let mut humanizer = Humanizer::with_rng(StdRng::seed_from_u64(7));

        let mut seen = [false; 4];
        for _ in 0..500 {
            let delay = humanizer.quantized_delay();
            assert!(in_bands(delay, &QUANTIZED_BANDS), "delay {delay} outside bands");
            for (i, &(lo, hi)) in QUANTIZED_BANDS.iter().enumerate() {
                if delay >= lo && delay <= hi {
                    seen[i] = true;
                }
            }
        }

        // Every band should be used
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_idle_interval_stays_in_bands() {
        let mut humanizer = Humanizer::new();

        for _ in 0..200 {
            let interval = humanizer.idle_interval();
            assert!(in_bands(interval, &IDLE_BANDS));
        }
    }

    #[test]
    fn test_key_hold_range() {
        let mut humanizer = Humanizer::new();

        for _ in 0..200 {
            let hold = humanizer.key_hold();
            assert!((MIN_KEY_HOLD..=MAX_KEY_HOLD).contains(&hold));
        }
    }

    #[test]
    fn test_click_timing_defaults() {
        let mut humanizer = Humanizer::with_rng(StdRng::seed_from_u64(1));

        for _ in 0..100 {
            let timing = humanizer.click_timing(0.0, 0.0, 0.0);
            assert_eq!(timing.pre, 0.0);
            assert!((MIN_CLICK_HOLD..=MAX_CLICK_HOLD).contains(&timing.hold));
            assert!((0.01..=0.04).contains(&timing.after));
        }
    }

    #[test]
    fn test_click_timing_with_caller_values() {
        let mut humanizer = Humanizer::with_rng(StdRng::seed_from_u64(2));

        for _ in 0..100 {
            let timing = humanizer.click_timing(1.0, 0.2, 0.5);
            assert!((1.049..=1.151).contains(&timing.pre));
            assert!((0.199..=0.331).contains(&timing.hold));
            assert!((0.519..=0.581).contains(&timing.after));
        }
    }

    #[test]
    fn test_spoofed_hold_floor() {
        let mut humanizer = Humanizer::new();

        for _ in 0..100 {
            assert!(humanizer.spoofed_hold(0.0) >= MIN_SPOOFED_HOLD);
        }
    }

    #[test]
    fn test_scaled_identity_range() {
        let mut humanizer = Humanizer::new();
        assert_eq!(humanizer.scaled(2.0, (1.0, 1.0)), 2.0);

        let value = humanizer.scaled(2.0, (1.5, 0.5));
        assert!((0.999..=3.001).contains(&value));
    }
}
