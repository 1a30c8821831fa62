//! Humanized clicks on top of the motion executor
//!
//! A click is: humanized pre-wait, move (trajectory or jump), a short settle,
//! spoofed button press with extra hold variance, humanized after-wait, then
//! an optional walk back to the original position. The mouse lock covers the
//! whole sequence.

use std::sync::Arc;

use rand::Rng;

use crate::host::WindowRect;
use crate::input::{MouseButton, Point};
use crate::stealth::Humanizer;
use crate::timing::sleep_secs;

use super::executor::{MotionExecutor, MotionKind, MotionOptions};

/// Caller-facing click parameters (seconds; zero means "pick a natural
/// value")
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOptions {
    pub pre: f64,
    pub hold: f64,
    pub after: f64,
    pub button: MouseButton,
    /// Walk a trajectory instead of jumping
    pub trajectory: bool,
    /// Walk back to the pre-click cursor position afterwards
    pub restore: bool,
    /// Allow spoofed injection
    pub inject: bool,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            pre: 0.0,
            hold: 0.0,
            after: 0.0,
            button: MouseButton::Left,
            trajectory: true,
            restore: false,
            inject: true,
        }
    }
}

impl ClickOptions {
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_timing(mut self, pre: f64, hold: f64, after: f64) -> Self {
        self.pre = pre;
        self.hold = hold;
        self.after = after;
        self
    }

    pub fn restoring(mut self) -> Self {
        self.restore = true;
        self
    }

    pub fn jumping(mut self) -> Self {
        self.trajectory = false;
        self
    }
}

/// Click front end sharing the executor's backend, injector and lock
#[derive(Debug, Clone)]
pub struct Clicker {
    executor: Arc<MotionExecutor>,
}

impl Clicker {
    pub fn new(executor: Arc<MotionExecutor>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Arc<MotionExecutor> {
        &self.executor
    }

    /// Click at window-relative `(x, y)`
    ///
    /// Returns whether any click primitive (spoofed or posted) succeeded.
    pub fn click_at(&self, x: i32, y: i32, options: ClickOptions) -> bool {
        // Held across the whole sequence, pre-sleep included
        let _lock = self.executor.state().lock_mouse();

        let mut humanizer = Humanizer::new();
        let timing = humanizer.click_timing(options.pre, options.hold, options.after);
        sleep_secs(timing.pre);

        let (original, settle) = if options.trajectory {
            let mut motion_options = MotionOptions::default().with_inject(options.inject);
            if options.restore {
                motion_options = motion_options.returning_original();
            }
            let motion = self.executor.move_to(x, y, motion_options);
            if motion.kind == MotionKind::Cancelled {
                log::info!("click at ({x}, {y}) dropped, cancelled during approach");
                return false;
            }
            (motion.original, humanizer.settle_after_trajectory())
        } else {
            let original = if options.restore {
                self.executor.backend().cursor_pos().ok()
            } else {
                None
            };
            let target = self.executor.host().to_screen(x, y);
            self.executor.execute(&[target], 0.0, options.inject);
            (original, humanizer.settle_after_jump())
        };
        sleep_secs(settle);

        let clicked = self.press(x, y, options, timing.hold, &mut humanizer);
        sleep_secs(timing.after);

        if let Some(original) = original {
            self.executor.restore(original);
        }
        clicked
    }

    /// Click a uniform random point inside the window-relative `area`
    ///
    /// `extend` grows (or with a negative value shrinks) the box by that
    /// fraction of its size on every side.
    pub fn click_box(&self, area: WindowRect, extend: f64, options: ClickOptions) -> bool {
        let point = random_point_in(&area, extend, &mut rand::thread_rng());
        self.click_at(point.x, point.y, options)
    }

    /// Click at a fraction of the window size
    pub fn click_relative(&self, fx: f64, fy: f64, options: ClickOptions) -> bool {
        let Some(rect) = self.executor.host().window_rect() else {
            log::warn!("window rect unknown, cannot click at relative ({fx:.3}, {fy:.3})");
            return false;
        };
        let (x, y) = rect.relative(fx, fy);
        self.click_at(x, y, options)
    }

    /// Sleep `timeout` scaled by a uniform factor from `range`; returns the
    /// seconds slept
    pub fn sleep_random(timeout: f64, range: (f64, f64)) -> f64 {
        let secs = Humanizer::new().scaled(timeout, range);
        sleep_secs(secs);
        secs
    }

    fn press(
        &self,
        x: i32,
        y: i32,
        options: ClickOptions,
        hold: f64,
        humanizer: &mut Humanizer,
    ) -> bool {
        let host = self.executor.host();

        if options.inject && host.is_foreground() {
            if let Some(injector) = self.executor.injector() {
                if injector.click_button(options.button, humanizer.spoofed_hold(hold)) {
                    return true;
                }
                log::warn!("[mouse spoof] click at ({x}, {y}) failed, falling back to posted click");
            }
        }

        host.post_click(x, y, options.button, hold)
    }
}

/// Uniform point in `area` grown by `extend` of its size on every side
pub fn random_point_in<R: Rng + ?Sized>(area: &WindowRect, extend: f64, rng: &mut R) -> Point {
    let pad_x = f64::from(area.width) * extend;
    let pad_y = f64::from(area.height) * extend;
    let x0 = f64::from(area.x) - pad_x;
    let y0 = f64::from(area.y) - pad_y;
    let x1 = f64::from(area.x + area.width) + pad_x;
    let y1 = f64::from(area.y + area.height) + pad_y;

    let x = if x0 < x1 { rng.gen_range(x0..x1) } else { x0 };
    let y = if y0 < y1 { rng.gen_range(y0..y1) } else { y0 };
    Point::new(x as i32, y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fidget::FidgetState;
    use crate::input::{DeviceIdentity, EventKind, InputBackend, Injector, Perturbation};
    use crate::testing::{FakeBackend, FakeHost};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build_clicker(backend: &Arc<FakeBackend>, host: &Arc<FakeHost>) -> Clicker {
        let injector = Injector::new(
            backend.clone(),
            DeviceIdentity::RAZER_HUNTSMAN_V3_PRO,
            DeviceIdentity::LOGITECH_RECEIVER,
        )
        .unwrap()
        .with_perturbation(Perturbation::none());
        let executor = MotionExecutor::new(
            backend.clone(),
            Some(Arc::new(injector)),
            host.clone(),
            Arc::new(FidgetState::new()),
        );
        Clicker::new(Arc::new(executor))
    }

    fn buttons(backend: &FakeBackend) -> Vec<(MouseButton, bool)> {
        backend
            .sent()
            .into_iter()
            .filter_map(|e| match e.kind() {
                EventKind::MouseButton { button, down } => Some((button, down)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_spoofed_click() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let clicker = build_clicker(&backend, &host);

        assert!(clicker.click_at(150, 90, ClickOptions::default()));

        assert_eq!(backend.cursor(), Point::new(150, 90));
        assert_eq!(
            buttons(&backend),
            vec![(MouseButton::Left, true), (MouseButton::Left, false)]
        );
        assert!(host.posted_clicks().is_empty());
        assert!(!clicker.executor().state().mouse_locked());
    }

    #[test]
    fn test_lock_held_during_pre_wait() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let clicker = build_clicker(&backend, &host);
        let state = clicker.executor().state().clone();

        let handle = std::thread::spawn(move || {
            clicker.click_at(20, 20, ClickOptions::default().jumping().with_timing(0.3, 0.0, 0.0))
        });
        std::thread::sleep(std::time::Duration::from_millis(100));

        // Still in the pre-wait: nothing sent yet, fidget already locked out
        assert!(backend.sent().is_empty());
        assert!(state.mouse_locked());

        assert!(handle.join().unwrap());
        assert!(!state.mouse_locked());
    }

    #[test]
    fn test_failed_spoof_posts_click() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let clicker = build_clicker(&backend, &host);
        backend.fail_sends(true);

        assert!(clicker.click_at(40, 30, ClickOptions::default().jumping()));

        assert_eq!(backend.cursor(), Point::new(40, 30));
        assert_eq!(host.posted_clicks(), vec![(40, 30, MouseButton::Left)]);
    }

    #[test]
    fn test_background_window_posts_click() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        host.set_foreground(false);
        let clicker = build_clicker(&backend, &host);

        assert!(clicker.click_at(
            12,
            34,
            ClickOptions::default().jumping().with_button(MouseButton::Right)
        ));
        assert!(buttons(&backend).is_empty());
        assert_eq!(host.posted_clicks(), vec![(12, 34, MouseButton::Right)]);
    }

    #[test]
    fn test_click_restores_cursor() {
        let start = Point::new(700, 20);
        let backend = Arc::new(FakeBackend::new().with_cursor(start));
        let host = Arc::new(FakeHost::new());
        let clicker = build_clicker(&backend, &host);

        assert!(clicker.click_at(100, 400, ClickOptions::default().restoring()));
        assert_eq!(backend.cursor(), start);

        backend.set_cursor_pos(start).unwrap();
        assert!(clicker.click_at(300, 300, ClickOptions::default().jumping().restoring()));
        assert_eq!(backend.cursor(), start);
    }

    #[test]
    fn test_click_relative_needs_window() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let clicker = build_clicker(&backend, &host);
        assert!(!clicker.click_relative(0.5, 0.5, ClickOptions::default()));

        let host = Arc::new(FakeHost::new().with_window(WindowRect::new(100, 0, 1000, 500)));
        let clicker = build_clicker(&backend, &host);
        assert!(clicker.click_relative(0.5, 0.2, ClickOptions::default().jumping()));
        assert_eq!(backend.cursor(), Point::new(600, 100));
    }

    #[test]
    fn test_random_point_in_box() {
        let mut rng = StdRng::seed_from_u64(8);
        let area = WindowRect::new(10, 20, 100, 50);

        for _ in 0..500 {
            let p = random_point_in(&area, 0.0, &mut rng);
            assert!(area.contains(p), "{p:?}");
        }
        for _ in 0..500 {
            let p = random_point_in(&area, 0.1, &mut rng);
            assert!((0..=120).contains(&p.x) && (15..=75).contains(&p.y), "{p:?}");
        }
    }

    #[test]
    fn test_sleep_random_scales() {
        let slept = Clicker::sleep_random(0.01, (1.0, 2.0));
        assert!((0.01..=0.02).contains(&slept));
    }
}
