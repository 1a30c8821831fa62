//! DNA Fidget - humanized input core for unattended game automation
//!
//! This library injects mouse and keyboard input that carries the identity of
//! real hardware, moves the cursor along randomized Bézier paths with human
//! cadence, and runs a background "fidget" worker that keeps an idle session
//! looking attended without ever fighting a foreground click.
//!
//! ## Anti-Detection
//!
//! The `stealth` module provides the quantized delay distributions shared by
//! clicks and the fidget worker.
//!
//! ## Host integration
//!
//! Window focus, coordinate conversion, task lifecycle and the "expected
//! context" probe come from a [`host::Host`] implementation supplied by the
//! automation framework.

pub mod config;
pub mod error;
pub mod fidget;
pub mod host;
pub mod input;
pub mod motion;
pub mod stealth;
pub mod timing;

#[cfg(test)]
mod testing;

use std::io;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::InputError;
use crate::fidget::{FidgetScheduler, FidgetState};
use crate::host::{Host, Spawner};
use crate::input::{InputBackend, Injector};
use crate::motion::{ClickOptions, Clicker, MotionExecutor};

/// One automation session's input stack
///
/// Built once per session and shared by reference; every component inside
/// is reachable through an `Arc` so foreground logic and the fidget worker
/// see the same injector and the same mouse lock.
#[derive(Debug)]
pub struct HumanInput {
    settings: Settings,
    injector: Option<Arc<Injector>>,
    executor: Arc<MotionExecutor>,
    clicker: Clicker,
    fidget: FidgetScheduler,
}

impl HumanInput {
    /// Build the input stack
    ///
    /// Settings are validated first. A failed device probe is not an error:
    /// spoofing is disabled for the session and every primitive uses its
    /// plain fallback.
    pub fn new(
        settings: Settings,
        backend: Arc<dyn InputBackend>,
        host: Arc<dyn Host>,
    ) -> Result<Self, InputError> {
        settings.validate()?;

        let injector = if settings.devices.spoof {
            match Injector::new(
                backend.clone(),
                settings.devices.keyboard,
                settings.devices.mouse,
            ) {
                Ok(injector) => Some(Arc::new(injector)),
                Err(e) => {
                    log::warn!("{e}; continuing without hardware spoofing");
                    None
                }
            }
        } else {
            log::info!("hardware spoofing disabled in settings");
            None
        };

        let state = Arc::new(FidgetState::new());
        state.set_hold_lalt(settings.afk.hold_lalt);

        let executor = Arc::new(
            MotionExecutor::new(backend, injector.clone(), host, state)
                .with_jump_threshold(settings.motion.jump_threshold),
        );
        let clicker = Clicker::new(executor.clone());
        let fidget = FidgetScheduler::new(executor.clone(), settings.clone())?;

        Ok(Self {
            settings,
            injector,
            executor,
            clicker,
            fidget,
        })
    }

    /// Build the stack on the Win32 backend
    #[cfg(windows)]
    pub fn windows(settings: Settings, host: Arc<dyn Host>) -> Result<Self, InputError> {
        Self::new(settings, Arc::new(input::WindowsBackend), host)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// `None` when spoofing is off for this session
    pub fn injector(&self) -> Option<&Arc<Injector>> {
        self.injector.as_ref()
    }

    pub fn executor(&self) -> &Arc<MotionExecutor> {
        &self.executor
    }

    pub fn clicker(&self) -> &Clicker {
        &self.clicker
    }

    /// Click options honoring the session's motion settings
    pub fn click_options(&self) -> ClickOptions {
        ClickOptions {
            trajectory: self.settings.motion.trajectory_clicks,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &Arc<FidgetState> {
        self.executor.state()
    }

    pub fn fidget(&self) -> &FidgetScheduler {
        &self.fidget
    }

    /// Start the fidget worker for the current task
    pub fn start_fidget(&mut self, spawner: &dyn Spawner) -> io::Result<bool> {
        self.fidget.start(spawner)
    }

    pub fn stop_fidget(&self) {
        self.fidget.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DeviceIdentity, Point};
    use crate::config::ConfigError;
    use crate::motion::MotionOptions;
    use crate::testing::{FakeBackend, FakeHost};

    #[test]
    fn test_session_with_spoofing() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let input = HumanInput::new(Settings::default(), backend.clone(), host).unwrap();

        let injector = input.injector().unwrap();
        assert_eq!(injector.mouse_identity(), DeviceIdentity::LOGITECH_RECEIVER);
        assert_eq!(input.executor().jump_threshold(), 5.0);
        assert!(!input.fidget().is_running());
    }

    #[test]
    fn test_failed_probe_degrades_to_plain_input() {
        let backend = Arc::new(FakeBackend::new().with_screen(0, 0));
        let host = Arc::new(FakeHost::new());
        let input = HumanInput::new(Settings::default(), backend.clone(), host).unwrap();

        assert!(input.injector().is_none());
        input
            .executor()
            .move_to(200, 100, MotionOptions::default().with_duration(0.01));
        assert_eq!(backend.send_calls(), 0);
        assert_eq!(backend.cursor(), Point::new(200, 100));
    }

    #[test]
    fn test_click_shares_lock_with_fidget_state() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let input = HumanInput::new(Settings::attentive_preset(), backend, host).unwrap();

        assert!(input.state().hold_lalt());
        let options = input.click_options().jumping();
        assert!(input.clicker().click_at(10, 10, options));
        assert!(!input.state().mouse_locked());
    }

    #[test]
    fn test_bad_settings_rejected() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let mut settings = Settings::default();
        settings.keys.companion = "???".to_string();

        assert!(matches!(
            HumanInput::new(settings, backend, host),
            Err(InputError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_slow_poll_slice_rejected() {
        let backend = Arc::new(FakeBackend::new());
        let host = Arc::new(FakeHost::new());
        let mut settings = Settings::default();
        settings.fidget.poll_slice_ms = 500;

        assert!(matches!(
            HumanInput::new(settings, backend, host),
            Err(InputError::InvalidSettings(ConfigError::Invalid(_)))
        ));
    }
}
