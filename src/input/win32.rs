//! Win32 backend built on `SendInput`
//!
//! Each [`InputEvent`] becomes one `INPUT` record; the device identity goes
//! into `dwExtraInfo`.

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    MapVirtualKeyW, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT,
    KEYBD_EVENT_FLAGS, KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MAPVK_VK_TO_VSC,
    MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN,
    MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP,
    MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN,
};

use crate::error::InputError;

use super::backend::{InputBackend, Point};
use super::device::{EventKind, InputEvent, MouseButton};

/// Pre-computed size of `INPUT` for `SendInput` calls.
const INPUT_SIZE: i32 = std::mem::size_of::<INPUT>() as i32;

/// `SendInput`-backed platform primitives
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsBackend;

impl WindowsBackend {
    pub fn new() -> Self {
        Self
    }
}

fn key_input(vk: u16, scan: u16, down: bool, extended: bool, extra: usize) -> INPUT {
    let mut flags = 0;
    if !down {
        flags |= KEYEVENTF_KEYUP.0;
    }
    if extended {
        flags |= KEYEVENTF_EXTENDEDKEY.0;
    }
    let flags = KEYBD_EVENT_FLAGS(flags);

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk),
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: extra,
            },
        },
    }
}

fn mouse_input(dx: i32, dy: i32, flags: MOUSE_EVENT_FLAGS, extra: usize) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: extra,
            },
        },
    }
}

fn button_flags(button: MouseButton, down: bool) -> MOUSE_EVENT_FLAGS {
    match (button, down) {
        (MouseButton::Left, true) => MOUSEEVENTF_LEFTDOWN,
        (MouseButton::Left, false) => MOUSEEVENTF_LEFTUP,
        (MouseButton::Right, true) => MOUSEEVENTF_RIGHTDOWN,
        (MouseButton::Right, false) => MOUSEEVENTF_RIGHTUP,
        (MouseButton::Middle, true) => MOUSEEVENTF_MIDDLEDOWN,
        (MouseButton::Middle, false) => MOUSEEVENTF_MIDDLEUP,
    }
}

fn to_raw(event: &InputEvent) -> INPUT {
    let extra = event.extra_info() as usize;
    match event.kind() {
        EventKind::Key {
            virtual_code,
            scan_code,
            down,
            extended,
        } => key_input(virtual_code, scan_code, down, extended, extra),
        EventKind::MouseMove { abs_x, abs_y } => mouse_input(
            abs_x,
            abs_y,
            MOUSE_EVENT_FLAGS(MOUSEEVENTF_MOVE.0 | MOUSEEVENTF_ABSOLUTE.0),
            extra,
        ),
        EventKind::MouseDelta { dx, dy } => mouse_input(dx, dy, MOUSEEVENTF_MOVE, extra),
        EventKind::MouseButton { button, down } => {
            mouse_input(0, 0, button_flags(button, down), extra)
        }
    }
}

impl InputBackend for WindowsBackend {
    fn send(&self, events: &[InputEvent]) -> u32 {
        if events.is_empty() {
            return 0;
        }
        let inputs: Vec<INPUT> = events.iter().map(to_raw).collect();
        unsafe { SendInput(&inputs, INPUT_SIZE) }
    }

    fn scan_code(&self, virtual_code: u16) -> u16 {
        unsafe { MapVirtualKeyW(u32::from(virtual_code), MAPVK_VK_TO_VSC) as u16 }
    }

    fn screen_size(&self) -> (i32, i32) {
        unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
    }

    fn cursor_pos(&self) -> Result<Point, InputError> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point)? };
        Ok(Point::new(point.x, point.y))
    }

    fn set_cursor_pos(&self, pos: Point) -> Result<(), InputError> {
        unsafe { SetCursorPos(pos.x, pos.y)? };
        Ok(())
    }
}
