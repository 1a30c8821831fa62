//! Configuration module
//!
//! Idle behavior toggles, hotkeys, device identities and motion tuning.

pub mod settings;

pub use settings::{
    AfkSettings, ConfigError, DeviceSettings, FidgetSettings, KeyConfig, MotionSettings, Settings,
};
