//! Error types for the input core
//!
//! Nothing in here is fatal to the host. Every variant maps to a
//! degraded-but-working path: a failed injection falls back to the plain
//! cursor primitive, a failed device probe disables spoofing for the session,
//! and a cancellation simply stops the current motion.

use thiserror::Error;

use crate::config::ConfigError;

/// Input subsystem errors
#[derive(Debug, Error)]
pub enum InputError {
    /// The platform accepted zero of the submitted events
    #[error("injection failed: {primitive} (0 of {submitted} events accepted)")]
    InjectionFailed {
        primitive: &'static str,
        submitted: usize,
    },

    /// The spoofing injector could not be constructed
    #[error("device probe failed: {0}")]
    DeviceProbeFailed(String),

    /// External cancellation observed while walking a trajectory
    #[error("cancelled during motion after {completed} of {total} points")]
    CancelledDuringMotion { completed: usize, total: usize },

    /// Key name not present in the virtual-key table
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// Settings rejected before the stack was built
    #[error(transparent)]
    InvalidSettings(#[from] ConfigError),

    /// Direct platform call failed (cursor query, cursor set, ...)
    #[error("platform error: {0}")]
    Platform(String),
}

#[cfg(windows)]
impl From<windows::core::Error> for InputError {
    fn from(err: windows::core::Error) -> Self {
        InputError::Platform(format!("Win32 error: {err}"))
    }
}
