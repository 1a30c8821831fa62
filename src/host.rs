//! Interfaces consumed from the surrounding automation framework
//!
//! The core never inspects frames or windows itself; everything it needs to
//! know about the game window and the task lifecycle comes through [`Host`].

use std::io;
use std::thread;

use crate::input::{MouseButton, Point};

/// Client area of the target window in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment test
    pub fn contains(&self, point: Point) -> bool {
        (self.x..self.x + self.width).contains(&point.x)
            && (self.y..self.y + self.height).contains(&point.y)
    }

    /// Window-relative pixel from fractional coordinates
    pub fn relative(&self, fx: f64, fy: f64) -> (i32, i32) {
        (
            (f64::from(self.width) * fx) as i32,
            (f64::from(self.height) * fy) as i32,
        )
    }
}

/// Automation framework collaborator
pub trait Host: Send + Sync {
    /// Whether the game window currently has focus
    fn is_foreground(&self) -> bool;

    /// Window-relative coordinates to screen coordinates
    fn to_screen(&self, x: i32, y: i32) -> Point;

    /// Whether a task is currently running
    fn task_active(&self) -> bool;

    /// Process-wide exit signal
    fn cancellation_requested(&self) -> bool;

    /// Whether the running task is paused
    fn is_paused(&self) -> bool {
        false
    }

    /// Opaque "are we in the expected game context" probe
    fn in_expected_context(&self) -> bool;

    /// Game window client rect, if known
    fn window_rect(&self) -> Option<WindowRect> {
        None
    }

    /// Message-posted key transition, used when spoofed injection is not
    /// possible (background window or failed `SendInput`)
    fn post_key(&self, vk: u16, down: bool) -> bool;

    /// Message-posted click at window-relative `(x, y)`
    fn post_click(&self, x: i32, y: i32, button: MouseButton, hold_secs: f64) -> bool;
}

/// Background job submission
pub trait Spawner: Send + Sync {
    fn submit(&self, job: Box<dyn FnOnce() + Send + 'static>) -> io::Result<()>;
}

/// Runs each job on a freshly spawned named thread
#[derive(Debug, Clone, Default)]
pub struct ThreadSpawner {
    name: Option<String>,
}

impl ThreadSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name given to spawned threads
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Spawner for ThreadSpawner {
    fn submit(&self, job: Box<dyn FnOnce() + Send + 'static>) -> io::Result<()> {
        let mut builder = thread::Builder::new();
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        builder.spawn(job).map(|_| ())
    }
}
