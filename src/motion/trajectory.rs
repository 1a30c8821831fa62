//! Cubic Bézier trajectory planning
//!
//! Paths bend through two randomly displaced control points and carry a
//! low-frequency sinusoidal wobble plus per-point noise in the middle 80 %
//! of the path, so repeated moves between the same endpoints never trace
//! the same curve.

use std::f64::consts::PI;

use rand::Rng;

use crate::input::Point;

/// Point count bounds
pub const MIN_POINTS: usize = 8;
pub const MAX_POINTS: usize = 60;

/// One sampled point per this many pixels of straight-line distance
const PIXELS_PER_POINT: f64 = 25.0;

/// Duration hint bounds (seconds)
const MIN_DURATION: f64 = 0.1;
const MAX_DURATION: f64 = 0.5;

/// A sampled trajectory position in whole screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest screen pixel
    pub fn to_pixel(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl From<Point> for TrajectoryPoint {
    fn from(p: Point) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

/// Planned path plus the suggested total travel time
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    /// Seconds
    pub duration: f64,
    /// Samples taken before deduplication
    pub sampled: usize,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn pixels(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(|p| p.to_pixel())
    }
}

/// Samples for a move of `distance` pixels
pub fn point_count(distance: f64) -> usize {
    ((distance / PIXELS_PER_POINT) as usize).clamp(MIN_POINTS, MAX_POINTS)
}

/// Suggested travel time for a move of `distance` pixels
pub fn duration_hint(distance: f64) -> f64 {
    (distance / 1000.0).clamp(MIN_DURATION, MAX_DURATION)
}

/// Plan with the thread-local generator
pub fn plan(start: Point, end: Point) -> Trajectory {
    plan_with(&mut rand::thread_rng(), start, end)
}

/// Plan a humanized path from `start` to `end`
///
/// The first point is always `start` and the last is always `end`; no two
/// adjacent points are equal.
pub fn plan_with<R: Rng + ?Sized>(rng: &mut R, start: Point, end: Point) -> Trajectory {
    let (sx, sy) = (f64::from(start.x), f64::from(start.y));
    let (ex, ey) = (f64::from(end.x), f64::from(end.y));
    let (dx, dy) = (ex - sx, ey - sy);
    let distance = start.distance(end);
    let count = point_count(distance);

    // Unit normal to the travel direction
    let (perp_x, perp_y) = if distance > 0.0 {
        (-dy / distance, dx / distance)
    } else {
        (0.0, 0.0)
    };

    let ctrl1_at = rng.gen_range(0.20..=0.35);
    let ctrl2_at = rng.gen_range(0.65..=0.80);

    let offset_range = distance * rng.gen_range(0.10..=0.25);
    let lateral1 = rng.gen_range(-offset_range..=offset_range);
    let lateral2 = if rng.gen_bool(0.5) {
        // S-curve
        -lateral1 * rng.gen_range(0.3..=0.8)
    } else {
        // C-curve
        lateral1 * rng.gen_range(0.5..=1.0)
    };

    let c1 = (
        sx + dx * ctrl1_at + perp_x * lateral1,
        sy + dy * ctrl1_at + perp_y * lateral1,
    );
    let c2 = (
        sx + dx * ctrl2_at + perp_x * lateral2,
        sy + dy * ctrl2_at + perp_y * lateral2,
    );

    let wave_frequency = rng.gen_range(1.5..=3.5);
    let wave_amplitude = distance * rng.gen_range(0.005..=0.02);
    let jitter = wave_amplitude * 0.5;

    let mut points = Vec::with_capacity(count);
    points.push(TrajectoryPoint::from(start));

    for i in 1..count - 1 {
        let t = i as f64 / (count - 1) as f64;
        let u = 1.0 - t;

        let mut x = u.powi(3) * sx + 3.0 * u.powi(2) * t * c1.0 + 3.0 * u * t.powi(2) * c2.0
            + t.powi(3) * ex;
        let mut y = u.powi(3) * sy + 3.0 * u.powi(2) * t * c1.1 + 3.0 * u * t.powi(2) * c2.1
            + t.powi(3) * ey;

        if t > 0.1 && t < 0.9 {
            // Tremor peaks mid-path
            let bell = 4.0 * t * (1.0 - t);
            let wave = (t * wave_frequency * PI).sin() * wave_amplitude * bell;
            x += perp_x * wave;
            y += perp_y * wave;

            if jitter > 0.0 {
                x += rng.gen_range(-jitter..=jitter);
                y += rng.gen_range(-jitter..=jitter);
            }
        }

        points.push(TrajectoryPoint::new(x.round(), y.round()));
    }

    points.push(TrajectoryPoint::from(end));
    points.dedup();

    Trajectory {
        points,
        duration: duration_hint(distance),
        sampled: count,
    }
}
