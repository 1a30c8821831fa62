//! Bounded idle cursor drift
//!
//! The accumulator tracks how far idle nudges have carried the cursor from
//! where it started. Near the origin it snaps out to a small off-center
//! target, otherwise it pulls back toward the origin, so the cursor wanders
//! within a few pixels forever without a visible trend.

use rand::seq::SliceRandom;
use rand::Rng;

/// Per-axis targets used when the accumulated drift is near zero
const SNAP_TARGETS: [i32; 4] = [-3, -2, 2, 3];

/// Squared distance below which the next step snaps outward
const SNAP_RADIUS_SQ: i32 = 4;

/// Accumulated idle drift in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drift {
    x: i32,
    y: i32,
}

impl Drift {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Next relative move; never `(0, 0)`
    ///
    /// Does not touch the accumulator; call [`Drift::apply`] once the move
    /// has been issued.
    pub fn next_step<R: Rng + ?Sized>(&self, rng: &mut R) -> (i32, i32) {
        let (target_x, target_y) = if self.x * self.x + self.y * self.y < SNAP_RADIUS_SQ {
            (
                *SNAP_TARGETS.choose(rng).unwrap_or(&2),
                *SNAP_TARGETS.choose(rng).unwrap_or(&2),
            )
        } else {
            (rng.gen_range(-1..=1), rng.gen_range(-1..=1))
        };

        let mut step = (target_x - self.x, target_y - self.y);
        if step == (0, 0) {
            step.0 = if rng.gen_bool(0.5) { 1 } else { -1 };
        }
        step
    }

    pub fn apply(&mut self, (dx, dy): (i32, i32)) {
        self.x += dx;
        self.y += dy;
    }
}
