//! Platform seam for event submission and cursor primitives

use crate::error::InputError;

use super::device::InputEvent;

/// Screen-space pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in pixels
    pub fn distance(&self, other: Point) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Operating-system input primitives
///
/// Implementations must be shareable across the foreground thread and the
/// fidget worker; none of the methods take `&mut self`.
pub trait InputBackend: Send + Sync {
    /// Submit events in order; returns how many the platform accepted
    fn send(&self, events: &[InputEvent]) -> u32;

    /// Hardware scan code for a virtual key under the active keyboard layout
    fn scan_code(&self, virtual_code: u16) -> u16;

    /// Primary screen size in pixels
    fn screen_size(&self) -> (i32, i32);

    /// Current cursor position in screen coordinates
    fn cursor_pos(&self) -> Result<Point, InputError>;

    /// Plain cursor placement, the non-spoofed fallback for moves
    fn set_cursor_pos(&self, pos: Point) -> Result<(), InputError>;
}
