//! User settings for the input core
//!
//! Every struct deserializes with defaults for missing fields, so a settings
//! file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::InputError;
use crate::input::keys;
use crate::input::DeviceIdentity;

/// Number-row keys offered to the fidget worker after exclusions
const NUMERIC_CANDIDATES: usize = 4;

/// Settings loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Idle behavior toggles
    pub afk: AfkSettings,
    /// In-game hotkeys
    pub keys: KeyConfig,
    /// Spoofed hardware identities
    pub devices: DeviceSettings,
    /// Cursor motion tuning
    pub motion: MotionSettings,
    /// Fidget worker tuning
    pub fidget: FidgetSettings,
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the core cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.motion.jump_threshold.is_finite() || self.motion.jump_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "motion.jump_threshold must be a non-negative number, got {}",
                self.motion.jump_threshold
            )));
        }

        if self.fidget.poll_slice_ms == 0 || self.fidget.poll_slice_ms > 100 {
            return Err(ConfigError::Invalid(format!(
                "fidget.poll_slice_ms must be within 1..=100, got {}",
                self.fidget.poll_slice_ms
            )));
        }

        if self.devices.spoof
            && (!self.devices.keyboard.is_valid() || !self.devices.mouse.is_valid())
        {
            return Err(ConfigError::Invalid(format!(
                "device identities must be non-zero (keyboard {}, mouse {})",
                self.devices.keyboard, self.devices.mouse
            )));
        }

        self.keys
            .resolve_all()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Drift and key presses on, LAlt held while in the team view
    pub fn attentive_preset() -> Self {
        Self {
            afk: AfkSettings {
                mouse_jitter: true,
                clamp_jitter_to_window: true,
                hold_lalt: true,
            },
            ..Default::default()
        }
    }

    /// No drift, no key presses; only foreground moves and clicks
    pub fn quiet_preset() -> Self {
        Self {
            afk: AfkSettings {
                mouse_jitter: false,
                clamp_jitter_to_window: false,
                hold_lalt: false,
            },
            fidget: FidgetSettings {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Idle behavior toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AfkSettings {
    /// Small idle cursor drift
    pub mouse_jitter: bool,
    /// Walk the cursor back into the window before drifting
    pub clamp_jitter_to_window: bool,
    /// Keep LAlt held while the player is in the expected context
    pub hold_lalt: bool,
}

impl Default for AfkSettings {
    fn default() -> Self {
        Self {
            mouse_jitter: true,
            clamp_jitter_to_window: true,
            hold_lalt: false,
        }
    }
}

/// In-game hotkeys, as key names understood by [`keys::vk_from_name`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub interact: String,
    pub dodge: String,
    pub helix_leap: String,
    pub ultimate: String,
    pub combat: String,
    pub companion: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            interact: "f".to_string(),
            dodge: "lshift".to_string(),
            helix_leap: "4".to_string(),
            ultimate: "q".to_string(),
            combat: "e".to_string(),
            companion: "z".to_string(),
        }
    }
}

impl KeyConfig {
    /// Keys the fidget worker may press: the companion key, then the first
    /// four of `1..=6` not bound to helix leap, ultimate or combat
    pub fn fidget_candidates(&self) -> Result<Vec<u16>, InputError> {
        let reserved = [&self.helix_leap, &self.ultimate, &self.combat];

        let mut names = vec![self.companion.as_str()];
        let numeric: Vec<String> = (1..=6)
            .map(|i| i.to_string())
            .filter(|n| !reserved.iter().any(|r| r.eq_ignore_ascii_case(n)))
            .take(NUMERIC_CANDIDATES)
            .collect();
        names.extend(numeric.iter().map(String::as_str));

        names.into_iter().map(keys::vk_from_name).collect()
    }

    fn resolve_all(&self) -> Result<(), InputError> {
        for name in [
            &self.interact,
            &self.dodge,
            &self.helix_leap,
            &self.ultimate,
            &self.combat,
            &self.companion,
        ] {
            keys::vk_from_name(name)?;
        }
        Ok(())
    }
}

/// Spoofed hardware identities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Attempt hardware-identity injection at all
    pub spoof: bool,
    pub keyboard: DeviceIdentity,
    pub mouse: DeviceIdentity,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            spoof: true,
            keyboard: DeviceIdentity::RAZER_HUNTSMAN_V3_PRO,
            mouse: DeviceIdentity::LOGITECH_RECEIVER,
        }
    }
}

/// Cursor motion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Moves shorter than this (pixels) jump directly
    pub jump_threshold: f64,
    /// Clicks walk a trajectory rather than jumping
    pub trajectory_clicks: bool,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            jump_threshold: 5.0,
            trajectory_clicks: true,
        }
    }
}

/// Fidget worker tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FidgetSettings {
    /// Run the worker while a task is active
    pub enabled: bool,
    /// Idle key presses from the candidate set
    pub key_presses: bool,
    /// Granularity of the worker's interruptible sleeps
    pub poll_slice_ms: u64,
}

impl Default for FidgetSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            key_presses: true,
            poll_slice_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.afk.mouse_jitter);
        assert!(!settings.afk.hold_lalt);
        assert_eq!(settings.motion.jump_threshold, 5.0);
        assert_eq!(settings.devices.keyboard, DeviceIdentity::RAZER_HUNTSMAN_V3_PRO);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"afk": {"hold_lalt": true}}"#).unwrap();
        assert!(settings.afk.hold_lalt);
        assert!(settings.afk.mouse_jitter);
        assert_eq!(settings.keys.companion, "z");
    }

    #[test]
    fn test_device_identity_from_json() {
        let json = r#"{"devices": {"mouse": {"vendor_id": 1133, "product_id": 49223}}}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.devices.mouse, DeviceIdentity::new(0x046D, 0xC047));
    }

    #[test]
    fn test_rejects_zero_identity_when_spoofing() {
        let json = r#"{"devices": {"keyboard": {"vendor_id": 0, "product_id": 0}}}"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(ConfigError::Invalid(_))
        ));

        let json = r#"{"devices": {"spoof": false, "keyboard": {"vendor_id": 0, "product_id": 0}}}"#;
        assert!(Settings::from_json(json).is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{"fidget": {"poll_slice_ms": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"motion": {"jump_threshold": -1.0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"keys": {"combat": "nope"}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Settings::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_fidget_candidates_skip_reserved() {
        let config = KeyConfig::default();
        // helix leap sits on 4
        assert_eq!(
            config.fidget_candidates().unwrap(),
            vec![b'Z' as u16, b'1' as u16, b'2' as u16, b'3' as u16, b'5' as u16]
        );

        let config = KeyConfig {
            helix_leap: "space".to_string(),
            ultimate: "1".to_string(),
            combat: "3".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.fidget_candidates().unwrap(),
            vec![b'Z' as u16, b'2' as u16, b'4' as u16, b'5' as u16, b'6' as u16]
        );
    }

    #[test]
    fn test_presets() {
        let quiet = Settings::quiet_preset();
        assert!(!quiet.fidget.enabled);
        assert!(!quiet.afk.mouse_jitter);

        let attentive = Settings::attentive_preset();
        assert!(attentive.afk.hold_lalt);
        assert!(attentive.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::attentive_preset();
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed.afk.hold_lalt, settings.afk.hold_lalt);
        assert_eq!(parsed.devices.mouse, settings.devices.mouse);
    }
}
