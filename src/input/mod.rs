//! Low-level input injection
//!
//! Device identities, event records, key tables, the platform backend seam
//! and the spoofing [`Injector`] built on top of it.

pub mod backend;
pub mod device;
pub mod injector;
pub mod keys;
#[cfg(windows)]
pub mod win32;

pub use backend::{InputBackend, Point};
pub use device::{DeviceIdentity, EventKind, InputEvent, MouseButton};
pub use injector::{Injector, Perturbation};
#[cfg(windows)]
pub use win32::WindowsBackend;
