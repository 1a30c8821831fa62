//! Flags shared between foreground actions and the fidget worker
//!
//! Ownership is per field, never per struct:
//!
//! | field | written by |
//! |---|---|
//! | `hold_lalt`, `skip_jitter` | foreground task logic |
//! | `mouse_lock` | motion executor / clicker (through [`MouseLockGuard`]) |
//! | `lalt_held`, `needs_resync` | fidget worker |
//!
//! Readers on the other side only use the values to skip a step, so relaxed
//! visibility is enough and no field needs a compare-and-swap.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct FidgetState {
    hold_lalt: AtomicBool,
    skip_jitter: AtomicBool,
    mouse_lock: AtomicUsize,
    lalt_held: AtomicBool,
    needs_resync: AtomicBool,
}

impl FidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request (or drop) the held-LAlt behavior
    pub fn set_hold_lalt(&self, enabled: bool) {
        self.hold_lalt.store(enabled, Ordering::Relaxed);
    }

    pub fn hold_lalt(&self) -> bool {
        self.hold_lalt.load(Ordering::Relaxed)
    }

    /// Suppress idle mouse drift without holding the lock
    pub fn set_skip_jitter(&self, skip: bool) {
        self.skip_jitter.store(skip, Ordering::Relaxed);
    }

    pub fn skip_jitter(&self) -> bool {
        self.skip_jitter.load(Ordering::Relaxed)
    }

    /// Hold the mouse lock until the guard drops
    ///
    /// Guards nest; the lock is released when the last one drops.
    pub fn lock_mouse(&self) -> MouseLockGuard<'_> {
        self.mouse_lock.fetch_add(1, Ordering::SeqCst);
        MouseLockGuard { state: self }
    }

    pub fn mouse_locked(&self) -> bool {
        self.mouse_lock.load(Ordering::SeqCst) > 0
    }

    pub fn lalt_held(&self) -> bool {
        self.lalt_held.load(Ordering::Relaxed)
    }

    pub fn needs_resync(&self) -> bool {
        self.needs_resync.load(Ordering::Relaxed)
    }

    pub(crate) fn set_modifier_flags(&self, held: bool, needs_resync: bool) {
        self.lalt_held.store(held, Ordering::Relaxed);
        self.needs_resync.store(needs_resync, Ordering::Relaxed);
    }
}

/// Releases one level of the mouse lock on drop
#[derive(Debug)]
pub struct MouseLockGuard<'a> {
    state: &'a FidgetState,
}

impl Drop for MouseLockGuard<'_> {
    fn drop(&mut self) {
        self.state.mouse_lock.fetch_sub(1, Ordering::SeqCst);
    }
}
