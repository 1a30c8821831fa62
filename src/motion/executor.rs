//! Trajectory execution with spoofed injection and cursor-set fallback
//!
//! Every public move holds the fidget mouse lock for its full duration, so
//! idle drift can never interleave with a purposeful move.

use std::sync::Arc;
use std::thread;

use rand::Rng;

use crate::error::InputError;
use crate::fidget::FidgetState;
use crate::host::{Host, WindowRect};
use crate::input::{InputBackend, Injector, Point};

use super::easing::StepTiming;
use super::trajectory::{self, Trajectory};

/// Below this distance (pixels) a move is a direct jump
pub const DEFAULT_JUMP_THRESHOLD: f64 = 5.0;

/// Per-call knobs for [`MotionExecutor::move_to`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOptions {
    /// Total travel time in seconds, planner hint when `None`
    pub duration: Option<f64>,
    /// Try spoofed injection before the cursor-set primitive
    pub inject: bool,
    /// Report the pre-move cursor position in [`Motion::original`]
    pub return_original: bool,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            duration: None,
            inject: true,
            return_original: false,
        }
    }
}

impl MotionOptions {
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn with_inject(mut self, inject: bool) -> Self {
        self.inject = inject;
        self
    }

    pub fn returning_original(mut self) -> Self {
        self.return_original = true;
        self
    }
}

/// How a move was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    /// Target within the jump threshold, placed directly
    Jump,
    /// Full trajectory walked
    Trajectory,
    /// Restore target already within the threshold, nothing sent
    Skipped,
    /// Cancellation observed between points
    Cancelled,
}

/// Outcome of one executor call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    /// Cursor position before the move, when requested
    pub original: Option<Point>,
    pub kind: MotionKind,
    /// Points actually placed
    pub points: usize,
    /// Whether spoofed injection failed and the call switched to cursor-set
    pub fell_back: bool,
}

impl Motion {
    fn skipped(original: Option<Point>) -> Self {
        Self {
            original,
            kind: MotionKind::Skipped,
            points: 0,
            fell_back: false,
        }
    }
}

/// Per-call injection mode; spoofing is dropped for good on first failure
struct Placement {
    spoof: bool,
    fell_back: bool,
}

/// Moves the cursor along humanized trajectories
pub struct MotionExecutor {
    backend: Arc<dyn InputBackend>,
    injector: Option<Arc<Injector>>,
    host: Arc<dyn Host>,
    state: Arc<FidgetState>,
    jump_threshold: f64,
}

impl std::fmt::Debug for MotionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionExecutor")
            .field("injector", &self.injector)
            .field("jump_threshold", &self.jump_threshold)
            .finish_non_exhaustive()
    }
}

impl MotionExecutor {
    /// `injector` is `None` when the device probe failed; every move then
    /// uses the cursor-set primitive.
    pub fn new(
        backend: Arc<dyn InputBackend>,
        injector: Option<Arc<Injector>>,
        host: Arc<dyn Host>,
        state: Arc<FidgetState>,
    ) -> Self {
        Self {
            backend,
            injector,
            host,
            state,
            jump_threshold: DEFAULT_JUMP_THRESHOLD,
        }
    }

    pub fn with_jump_threshold(mut self, pixels: f64) -> Self {
        self.jump_threshold = pixels.max(0.0);
        self
    }

    pub fn backend(&self) -> &Arc<dyn InputBackend> {
        &self.backend
    }

    pub fn injector(&self) -> Option<&Arc<Injector>> {
        self.injector.as_ref()
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    pub fn state(&self) -> &Arc<FidgetState> {
        &self.state
    }

    pub fn jump_threshold(&self) -> f64 {
        self.jump_threshold
    }

    /// Move to window-relative `(x, y)`
    pub fn move_to(&self, x: i32, y: i32, options: MotionOptions) -> Motion {
        let target = self.host.to_screen(x, y);
        self.move_to_screen(target, options)
    }

    /// Move to a screen-space target without host conversion
    pub fn move_to_screen(&self, target: Point, options: MotionOptions) -> Motion {
        let _lock = self.state.lock_mouse();
        self.travel(target, options, false)
    }

    /// Walk back to `original`; no-op when already within the threshold
    pub fn restore(&self, original: Point) -> Motion {
        let _lock = self.state.lock_mouse();
        self.travel(original, MotionOptions::default(), true)
    }

    /// Walk a pre-planned path
    pub fn execute(&self, points: &[Point], duration: f64, inject: bool) -> Motion {
        let _lock = self.state.lock_mouse();
        let mut placement = self.placement(inject);
        let (placed, cancelled) =
            self.walk(points, duration, &mut placement, &mut rand::thread_rng());

        Motion {
            original: None,
            kind: if cancelled {
                MotionKind::Cancelled
            } else {
                MotionKind::Trajectory
            },
            points: placed,
            fell_back: placement.fell_back,
        }
    }

    /// If the cursor lies outside the game window, walk it to a random point
    /// in the window's central 20-80 % region
    ///
    /// Returns `true` when a move was made.
    pub fn ensure_cursor_in_window(&self) -> bool {
        let Some(rect) = self.host.window_rect() else {
            return false;
        };
        let cursor = match self.backend.cursor_pos() {
            Ok(pos) => pos,
            Err(e) => {
                log::warn!("cursor query failed, not clamping into window: {e}");
                return false;
            }
        };
        if rect.contains(cursor) {
            return false;
        }

        let target = random_inner_point(&rect, &mut rand::thread_rng());
        log::debug!("cursor {cursor:?} outside window, moving to {target:?}");
        self.move_to_screen(target, MotionOptions::default());
        true
    }

    /// Move to the fractional window position `(fx, fy)`, but only while the
    /// cursor is inside the game window and, when `boxes` is non-empty, inside
    /// one of them
    ///
    /// `boxes` are window-relative. Without a known window rect there is no
    /// target to compute and nothing moves. Returns `true` when a move was
    /// made.
    pub fn move_relative_if_in_window(
        &self,
        fx: f64,
        fy: f64,
        boxes: &[WindowRect],
        use_trajectory: bool,
    ) -> bool {
        let Some(rect) = self.host.window_rect() else {
            return false;
        };
        let cursor = match self.backend.cursor_pos() {
            Ok(pos) => pos,
            Err(e) => {
                log::warn!("cursor query failed, skipping window-relative move: {e}");
                return false;
            }
        };
        if !rect.contains(cursor) {
            return false;
        }
        if !boxes.is_empty() && !boxes.iter().any(|b| self.screen_box(b).contains(cursor)) {
            log::debug!("cursor {cursor:?} outside every allowed box, not moving");
            return false;
        }

        let (x, y) = rect.relative(fx, fy);
        if use_trajectory {
            self.move_to(x, y, MotionOptions::default());
            true
        } else {
            let _lock = self.state.lock_mouse();
            self.set_cursor(self.host.to_screen(x, y))
        }
    }

    /// Relative nudge, only while the cursor is inside the game window
    ///
    /// With no known window rect the nudge is always allowed.
    pub fn nudge_if_in_window(&self, dx: i32, dy: i32) -> bool {
        let cursor = match self.backend.cursor_pos() {
            Ok(pos) => pos,
            Err(e) => {
                log::warn!("cursor query failed, skipping relative move: {e}");
                return false;
            }
        };
        if let Some(rect) = self.host.window_rect() {
            if !rect.contains(cursor) {
                return false;
            }
        }

        if let Some(injector) = self.spoofing_injector(true) {
            if injector.move_relative(dx, dy) {
                return true;
            }
            log::warn!("[mouse spoof] relative move failed, falling back to SetCursorPos");
        }

        let target = Point::new(cursor.x + dx, cursor.y + dy);
        self.set_cursor(target)
    }

    fn screen_box(&self, area: &WindowRect) -> WindowRect {
        let origin = self.host.to_screen(area.x, area.y);
        WindowRect::new(origin.x, origin.y, area.width, area.height)
    }

    fn travel(&self, target: Point, options: MotionOptions, restoring: bool) -> Motion {
        let current = match self.backend.cursor_pos() {
            Ok(pos) => pos,
            Err(e) => {
                log::warn!("cursor query failed, jumping straight to {target:?}: {e}");
                let mut placement = self.placement(options.inject);
                self.place(target, &mut placement);
                return Motion {
                    original: None,
                    kind: MotionKind::Jump,
                    points: 1,
                    fell_back: placement.fell_back,
                };
            }
        };
        let original = options.return_original.then_some(current);

        if current.distance(target) < self.jump_threshold {
            if restoring {
                return Motion::skipped(original);
            }
            let mut placement = self.placement(options.inject);
            self.place(target, &mut placement);
            return Motion {
                original,
                kind: MotionKind::Jump,
                points: 1,
                fell_back: placement.fell_back,
            };
        }

        let mut rng = rand::thread_rng();
        let planned: Trajectory = trajectory::plan_with(&mut rng, current, target);
        let duration = options.duration.unwrap_or(planned.duration);
        let points: Vec<Point> = planned.pixels().collect();

        let mut placement = self.placement(options.inject);
        let (placed, cancelled) = self.walk(&points, duration, &mut placement, &mut rng);

        Motion {
            original,
            kind: if cancelled {
                MotionKind::Cancelled
            } else {
                MotionKind::Trajectory
            },
            points: placed,
            fell_back: placement.fell_back,
        }
    }

    /// Returns points placed and whether cancellation cut the walk short
    fn walk<R: Rng + ?Sized>(
        &self,
        points: &[Point],
        duration: f64,
        placement: &mut Placement,
        rng: &mut R,
    ) -> (usize, bool) {
        let timing = StepTiming::new(duration, points.len());

        for (index, &point) in points.iter().enumerate() {
            if self.host.cancellation_requested() {
                let err = InputError::CancelledDuringMotion {
                    completed: index,
                    total: points.len(),
                };
                log::info!("{err}");
                return (index, true);
            }

            self.place(point, placement);

            if let Some(delay) = timing.delay_for(index, rng) {
                thread::sleep(delay);
            }
        }

        (points.len(), false)
    }

    fn placement(&self, inject: bool) -> Placement {
        Placement {
            spoof: inject && self.injector.is_some(),
            fell_back: false,
        }
    }

    fn spoofing_injector(&self, inject: bool) -> Option<&Arc<Injector>> {
        if inject && self.host.is_foreground() {
            self.injector.as_ref()
        } else {
            None
        }
    }

    fn place(&self, point: Point, placement: &mut Placement) {
        if let Some(injector) = self.spoofing_injector(placement.spoof) {
            if injector.move_absolute(point.x, point.y) {
                return;
            }
            log::warn!(
                "[mouse spoof] move to ({}, {}) failed, using SetCursorPos for the rest of this move",
                point.x,
                point.y
            );
            placement.spoof = false;
            placement.fell_back = true;
        }
        self.set_cursor(point);
    }

    fn set_cursor(&self, point: Point) -> bool {
        match self.backend.set_cursor_pos(point) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("SetCursorPos({}, {}) failed: {e}", point.x, point.y);
                false
            }
        }
    }
}

/// Uniform point in the central 20-80 % of `rect`, in screen coordinates
pub fn random_inner_point<R: Rng + ?Sized>(rect: &WindowRect, rng: &mut R) -> Point {
    let (rx, ry) = rect.relative(rng.gen_range(0.2..=0.8), rng.gen_range(0.2..=0.8));
    Point::new(rect.x + rx, rect.y + ry)
}
