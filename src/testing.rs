//! In-memory backend and host used by the unit tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::InputError;
use crate::host::{Host, WindowRect};
use crate::input::{EventKind, InputBackend, InputEvent, MouseButton, Point};
use crate::timing::Clock;

/// Records every submitted event; absolute moves update the fake cursor
pub struct FakeBackend {
    screen: (i32, i32),
    fail: AtomicBool,
    send_calls: AtomicUsize,
    sent: Mutex<Vec<InputEvent>>,
    cursor: Mutex<Point>,
    cursor_sets: Mutex<Vec<Point>>,
}

impl FakeBackend {
    /// 65535x65535 screen so normalized coordinates equal pixels
    pub fn new() -> Self {
        Self {
            screen: (65535, 65535),
            fail: AtomicBool::new(false),
            send_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            cursor: Mutex::new(Point::default()),
            cursor_sets: Mutex::new(Vec::new()),
        }
    }

    pub fn with_screen(mut self, width: i32, height: i32) -> Self {
        self.screen = (width, height);
        self
    }

    pub fn with_cursor(self, pos: Point) -> Self {
        *self.cursor.lock().unwrap() = pos;
        self
    }

    /// Make every `send` report zero accepted events
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<InputEvent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn cursor_sets(&self) -> Vec<Point> {
        self.cursor_sets.lock().unwrap().clone()
    }

    pub fn cursor(&self) -> Point {
        *self.cursor.lock().unwrap()
    }

    /// Key transitions as `(vk, down)`
    pub fn keys(&self) -> Vec<(u16, bool)> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e.kind() {
                EventKind::Key {
                    virtual_code, down, ..
                } => Some((virtual_code, down)),
                _ => None,
            })
            .collect()
    }

    /// Relative moves as `(dx, dy)`
    pub fn deltas(&self) -> Vec<(i32, i32)> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e.kind() {
                EventKind::MouseDelta { dx, dy } => Some((dx, dy)),
                _ => None,
            })
            .collect()
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBackend for FakeBackend {
    fn send(&self, events: &[InputEvent]) -> u32 {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return 0;
        }

        let mut cursor = self.cursor.lock().unwrap();
        for event in events {
            match event.kind() {
                EventKind::MouseMove { abs_x, abs_y } => {
                    let x = i64::from(abs_x) * i64::from(self.screen.0) / 65535;
                    let y = i64::from(abs_y) * i64::from(self.screen.1) / 65535;
                    *cursor = Point::new(x as i32, y as i32);
                }
                EventKind::MouseDelta { dx, dy } => {
                    *cursor = Point::new(cursor.x + dx, cursor.y + dy);
                }
                _ => {}
            }
        }
        self.sent.lock().unwrap().extend_from_slice(events);
        events.len() as u32
    }

    fn scan_code(&self, virtual_code: u16) -> u16 {
        virtual_code.wrapping_add(0x10) & 0x00FF
    }

    fn screen_size(&self) -> (i32, i32) {
        self.screen
    }

    fn cursor_pos(&self) -> Result<Point, InputError> {
        Ok(*self.cursor.lock().unwrap())
    }

    fn set_cursor_pos(&self, pos: Point) -> Result<(), InputError> {
        *self.cursor.lock().unwrap() = pos;
        self.cursor_sets.lock().unwrap().push(pos);
        Ok(())
    }
}

/// Host whose every answer is a settable flag
pub struct FakeHost {
    pub foreground: AtomicBool,
    pub task_active: AtomicBool,
    pub cancelled: AtomicBool,
    pub paused: AtomicBool,
    pub in_context: AtomicBool,
    pub window: Option<WindowRect>,
    posted_keys: Mutex<Vec<(u16, bool)>>,
    posted_clicks: Mutex<Vec<(i32, i32, MouseButton)>>,
}

impl FakeHost {
    /// Foreground, task active, in context, no window rect
    pub fn new() -> Self {
        Self {
            foreground: AtomicBool::new(true),
            task_active: AtomicBool::new(true),
            cancelled: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            in_context: AtomicBool::new(true),
            window: None,
            posted_keys: Mutex::new(Vec::new()),
            posted_clicks: Mutex::new(Vec::new()),
        }
    }

    pub fn with_window(mut self, rect: WindowRect) -> Self {
        self.window = Some(rect);
        self
    }

    pub fn set_foreground(&self, value: bool) {
        self.foreground.store(value, Ordering::SeqCst);
    }

    pub fn set_in_context(&self, value: bool) {
        self.in_context.store(value, Ordering::SeqCst);
    }

    pub fn set_task_active(&self, value: bool) {
        self.task_active.store(value, Ordering::SeqCst);
    }

    pub fn set_cancelled(&self, value: bool) {
        self.cancelled.store(value, Ordering::SeqCst);
    }

    pub fn posted_keys(&self) -> Vec<(u16, bool)> {
        self.posted_keys.lock().unwrap().clone()
    }

    pub fn posted_clicks(&self) -> Vec<(i32, i32, MouseButton)> {
        self.posted_clicks.lock().unwrap().clone()
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FakeHost {
    fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }

    fn to_screen(&self, x: i32, y: i32) -> Point {
        match self.window {
            Some(rect) => Point::new(rect.x + x, rect.y + y),
            None => Point::new(x, y),
        }
    }

    fn task_active(&self) -> bool {
        self.task_active.load(Ordering::SeqCst)
    }

    fn cancellation_requested(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn in_expected_context(&self) -> bool {
        self.in_context.load(Ordering::SeqCst)
    }

    fn window_rect(&self) -> Option<WindowRect> {
        self.window
    }

    fn post_key(&self, vk: u16, down: bool) -> bool {
        self.posted_keys.lock().unwrap().push((vk, down));
        true
    }

    fn post_click(&self, x: i32, y: i32, button: MouseButton, _hold_secs: f64) -> bool {
        self.posted_clicks.lock().unwrap().push((x, y, button));
        true
    }
}

/// Manually advanced clock; clones share the same timeline
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, secs: f64) {
        if let Ok(mut now) = self.now.lock() {
            *now = secs;
        }
    }

    pub fn advance(&self, secs: f64) {
        if let Ok(mut now) = self.now.lock() {
            *now += secs;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.lock().map(|now| *now).unwrap_or_default()
    }
}
