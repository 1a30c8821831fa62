//! Hardware-identity spoofing injector
//!
//! Builds keyboard and mouse events that carry the vendor/product pair of a
//! real device and submits them through an [`InputBackend`]. A `false`
//! return always means "the platform took zero events"; callers are expected
//! to fall back to a plainer primitive rather than treat it as fatal.

use std::sync::Arc;

use rand::Rng;

use crate::error::InputError;
use crate::timing::sleep_secs;

use super::backend::InputBackend;
use super::device::{DeviceIdentity, EventKind, InputEvent, MouseButton};
use super::keys;

/// Upper bound of the normalized absolute coordinate space
const ABSOLUTE_MAX: i64 = 65535;

/// Random per-event variance applied by the injector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    /// Probability that a scan code's high byte is rewritten
    pub scan_code_probability: f64,
    /// Probability that an absolute move is nudged before conversion
    pub move_jitter_probability: f64,
    /// Maximum nudge in pixels per axis
    pub move_jitter_px: i32,
}

impl Default for Perturbation {
    fn default() -> Self {
        Self {
            scan_code_probability: 0.05,
            move_jitter_probability: 0.05,
            move_jitter_px: 2,
        }
    }
}

impl Perturbation {
    /// No variance at all (for testing)
    pub fn none() -> Self {
        Self {
            scan_code_probability: 0.0,
            move_jitter_probability: 0.0,
            move_jitter_px: 0,
        }
    }
}

/// Keyboard and mouse injector with spoofed device identities
pub struct Injector {
    backend: Arc<dyn InputBackend>,
    keyboard: DeviceIdentity,
    mouse: DeviceIdentity,
    perturbation: Perturbation,
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("keyboard", &self.keyboard)
            .field("mouse", &self.mouse)
            .field("perturbation", &self.perturbation)
            .finish_non_exhaustive()
    }
}

impl Injector {
    /// Probe the backend and build an injector
    ///
    /// Fails with [`InputError::DeviceProbeFailed`] when either identity is
    /// zero or the backend reports no usable screen.
    pub fn new(
        backend: Arc<dyn InputBackend>,
        keyboard: DeviceIdentity,
        mouse: DeviceIdentity,
    ) -> Result<Self, InputError> {
        if !keyboard.is_valid() || !mouse.is_valid() {
            return Err(InputError::DeviceProbeFailed(format!(
                "zero device identity (keyboard {keyboard}, mouse {mouse})"
            )));
        }

        let (width, height) = backend.screen_size();
        if width <= 0 || height <= 0 {
            return Err(InputError::DeviceProbeFailed(format!(
                "screen metrics unavailable ({width}x{height})"
            )));
        }

        log::info!("[keyboard spoof] using device {keyboard}");
        log::info!("[mouse spoof] using device {mouse}");

        Ok(Self {
            backend,
            keyboard,
            mouse,
            perturbation: Perturbation::default(),
        })
    }

    /// Set the per-event variance
    pub fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    pub fn backend(&self) -> &Arc<dyn InputBackend> {
        &self.backend
    }

    pub fn keyboard_identity(&self) -> DeviceIdentity {
        self.keyboard
    }

    pub fn mouse_identity(&self) -> DeviceIdentity {
        self.mouse
    }

    /// Scan code for `vk`, occasionally with its high byte rewritten
    fn scan_code(&self, vk: u16) -> u16 {
        let scan = self.backend.scan_code(vk);
        let mut rng = rand::thread_rng();
        if rng.gen::<f64>() < self.perturbation.scan_code_probability {
            let high = if rng.gen_bool(0.5) { 0x0100 } else { 0 };
            (scan & 0x00FF) | high
        } else {
            scan
        }
    }

    /// Build a keyboard event without submitting it
    pub fn key_event(&self, vk: u16, down: bool) -> InputEvent {
        InputEvent::new(
            EventKind::Key {
                virtual_code: vk,
                scan_code: self.scan_code(vk),
                down,
                extended: keys::is_extended(vk),
            },
            self.keyboard,
        )
    }

    /// Submit events, mapping "zero accepted" to [`InputError::InjectionFailed`]
    pub fn submit(&self, primitive: &'static str, events: &[InputEvent]) -> Result<(), InputError> {
        if self.backend.send(events) == 0 {
            return Err(InputError::InjectionFailed {
                primitive,
                submitted: events.len(),
            });
        }
        Ok(())
    }

    /// Press or release a key
    pub fn send_key(&self, vk: u16, down: bool) -> bool {
        let event = self.key_event(vk, down);
        if let Err(e) = self.submit("SendInput KEY", &[event]) {
            log::warn!("[keyboard spoof] {e}: VK={vk:#04x}, down={down}");
            return false;
        }
        true
    }

    /// Down, hold, up
    pub fn press_key(&self, vk: u16, hold_secs: f64) -> bool {
        if !self.send_key(vk, true) {
            return false;
        }
        sleep_secs(hold_secs);
        self.send_key(vk, false)
    }

    /// Convert screen pixels to the 0..=65535 absolute space
    pub fn normalize(&self, x: i32, y: i32) -> (i32, i32) {
        let (width, height) = self.backend.screen_size();
        let width = i64::from(width.max(1));
        let height = i64::from(height.max(1));
        let abs_x = (i64::from(x) * ABSOLUTE_MAX / width).clamp(0, ABSOLUTE_MAX);
        let abs_y = (i64::from(y) * ABSOLUTE_MAX / height).clamp(0, ABSOLUTE_MAX);
        (abs_x as i32, abs_y as i32)
    }

    fn jitter(&self, x: i32, y: i32) -> (i32, i32) {
        let max = self.perturbation.move_jitter_px;
        let mut rng = rand::thread_rng();
        if max > 0 && rng.gen::<f64>() < self.perturbation.move_jitter_probability {
            (x + rng.gen_range(-max..=max), y + rng.gen_range(-max..=max))
        } else {
            (x, y)
        }
    }

    /// Build an absolute move event for screen pixel `(x, y)`
    pub fn move_event(&self, x: i32, y: i32) -> InputEvent {
        let (x, y) = self.jitter(x, y);
        let (abs_x, abs_y) = self.normalize(x, y);
        InputEvent::new(EventKind::MouseMove { abs_x, abs_y }, self.mouse)
    }

    /// Move the cursor to screen pixel `(x, y)`
    pub fn move_absolute(&self, x: i32, y: i32) -> bool {
        let event = self.move_event(x, y);
        if let Err(e) = self.submit("SendInput MOVE", &[event]) {
            log::warn!("[mouse spoof] {e}: ({x}, {y})");
            return false;
        }
        true
    }

    /// Relative move by `(dx, dy)` mickeys
    pub fn move_relative(&self, dx: i32, dy: i32) -> bool {
        let event = InputEvent::new(EventKind::MouseDelta { dx, dy }, self.mouse);
        if let Err(e) = self.submit("SendInput relative MOVE", &[event]) {
            log::warn!("[mouse spoof] {e}: ({dx}, {dy})");
            return false;
        }
        true
    }

    /// Down, hold for `hold_secs` (negative treated as zero), up
    ///
    /// The up event is built independently of the down event.
    pub fn click_button(&self, button: MouseButton, hold_secs: f64) -> bool {
        let down = InputEvent::new(EventKind::MouseButton { button, down: true }, self.mouse);
        if let Err(e) = self.submit("SendInput button DOWN", &[down]) {
            log::warn!("[mouse spoof] {e}: {button:?}");
            return false;
        }

        sleep_secs(hold_secs);

        let up = InputEvent::new(EventKind::MouseButton { button, down: false }, self.mouse);
        if let Err(e) = self.submit("SendInput button UP", &[up]) {
            log::warn!("[mouse spoof] {e}: {button:?}");
            return false;
        }
        true
    }
}
