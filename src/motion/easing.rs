//! Per-point cadence along a trajectory
//!
//! Three phases: a slow start, a fast cruise and a slow finish. Every delay
//! is scaled by ±15 % jitter and never drops below one millisecond.

use std::time::Duration;

use rand::Rng;

/// Floor applied to every step delay
pub const MIN_STEP_DELAY: Duration = Duration::from_millis(1);

/// Jitter applied on top of the eased delay
const STEP_JITTER: f64 = 0.15;

/// Slowdown multiplier for a point at `progress` (0.0..=1.0) along the path
///
/// The cruise phase samples `0.3 ± 0.1`, so the result is only deterministic
/// in the ramp-up and ramp-down phases.
pub fn easing_factor<R: Rng + ?Sized>(progress: f64, rng: &mut R) -> f64 {
    if progress < 0.2 {
        2.5 - 5.0 * progress
    } else if progress > 0.85 {
        1.0 + 8.0 * (progress - 0.85)
    } else {
        0.3 + rng.gen_range(-0.1..=0.1)
    }
}

/// Delay schedule for one trajectory walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTiming {
    /// Total travel time in seconds
    pub duration: f64,
    /// Number of points walked
    pub points: usize,
}

impl StepTiming {
    pub fn new(duration: f64, points: usize) -> Self {
        Self { duration, points }
    }

    /// Unscaled time slot per point in seconds
    pub fn base_step(&self) -> f64 {
        if self.points == 0 {
            0.0
        } else {
            self.duration.max(0.0) / self.points as f64
        }
    }

    /// Delay after the point at `index`, `None` after the last point
    pub fn delay_for<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Option<Duration> {
        if index + 1 >= self.points {
            return None;
        }

        let progress = index as f64 / (self.points - 1).max(1) as f64;
        let jitter = 1.0 + rng.gen_range(-STEP_JITTER..=STEP_JITTER);
        let secs = self.base_step() * easing_factor(progress, rng) * jitter;

        Some(Duration::from_secs_f64(secs.max(0.0)).max(MIN_STEP_DELAY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_easing_phases() {
        let mut rng = StdRng::seed_from_u64(1);

        assert!((easing_factor(0.0, &mut rng) - 2.5).abs() < 1e-9);
        assert!((easing_factor(0.1, &mut rng) - 2.0).abs() < 1e-9);
        assert!((easing_factor(1.0, &mut rng) - 2.2).abs() < 1e-9);

        for _ in 0..200 {
            let cruise = easing_factor(0.5, &mut rng);
            assert!((0.19..=0.41).contains(&cruise));
        }
    }

    #[test]
    fn test_start_slower_than_cruise() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            assert!(easing_factor(0.05, &mut rng) > easing_factor(0.5, &mut rng));
            assert!(easing_factor(0.95, &mut rng) > easing_factor(0.5, &mut rng));
        }
    }

    #[test]
    fn test_no_delay_after_last_point() {
        let mut rng = StdRng::seed_from_u64(3);
        let timing = StepTiming::new(0.3, 12);

        for i in 0..11 {
            assert!(timing.delay_for(i, &mut rng).is_some());
        }
        assert_eq!(timing.delay_for(11, &mut rng), None);
    }

    #[test]
    fn test_delay_floor() {
        let mut rng = StdRng::seed_from_u64(4);
        let timing = StepTiming::new(0.0, 60);

        for i in 0..59 {
            let delay = timing.delay_for(i, &mut rng).unwrap();
            assert!(delay >= MIN_STEP_DELAY);
        }
    }

    #[test]
    fn test_slow_finish_reached() {
        let mut rng = StdRng::seed_from_u64(6);

        // 0.025 s slot * (1 + 8 * (10/11 - 0.85)) * (1 ± 0.15)
        let timing = StepTiming::new(0.3, 12);
        for _ in 0..200 {
            let delay = timing.delay_for(10, &mut rng).unwrap().as_secs_f64();
            assert!((0.0312..=0.0424).contains(&delay), "delay {delay}");
        }

        // 0.1 s slot * (1 + 8 * (6/7 - 0.85)) * (1 ± 0.15)
        let timing = StepTiming::new(0.8, 8);
        for _ in 0..200 {
            let delay = timing.delay_for(6, &mut rng).unwrap().as_secs_f64();
            assert!((0.0898..=0.1216).contains(&delay), "delay {delay}");
        }
    }

    #[test]
    fn test_delay_bounds_first_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let timing = StepTiming::new(0.3, 10);

        // 0.03 s slot * 2.5 * (1 ± 0.15)
        for _ in 0..100 {
            let delay = timing.delay_for(0, &mut rng).unwrap().as_secs_f64();
            assert!((0.0637..=0.0863).contains(&delay), "delay {delay}");
        }
    }
}
