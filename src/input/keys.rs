//! Virtual-key codes and key name lookup
//!
//! Hotkeys arrive from the host configuration as short strings
//! (`"lalt"`, `"4"`, `"f"`); the injector works in Win32 virtual-key codes.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::InputError;

pub const VK_BACK: u16 = 0x08;
pub const VK_TAB: u16 = 0x09;
pub const VK_RETURN: u16 = 0x0D;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_ESCAPE: u16 = 0x1B;
pub const VK_SPACE: u16 = 0x20;
pub const VK_PRIOR: u16 = 0x21;
pub const VK_NEXT: u16 = 0x22;
pub const VK_END: u16 = 0x23;
pub const VK_HOME: u16 = 0x24;
pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;
pub const VK_SNAPSHOT: u16 = 0x2C;
pub const VK_INSERT: u16 = 0x2D;
pub const VK_DELETE: u16 = 0x2E;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_RWIN: u16 = 0x5C;
pub const VK_APPS: u16 = 0x5D;
pub const VK_F1: u16 = 0x70;
pub const VK_LSHIFT: u16 = 0xA0;
pub const VK_RSHIFT: u16 = 0xA1;
pub const VK_LCONTROL: u16 = 0xA2;
pub const VK_RCONTROL: u16 = 0xA3;
pub const VK_LMENU: u16 = 0xA4;
pub const VK_RMENU: u16 = 0xA5;

/// Keys sent with `KEYEVENTF_EXTENDEDKEY`: navigation cluster,
/// Insert/Delete/PrintScreen, Windows and menu keys
const EXTENDED_KEYS: [u16; 14] = [
    VK_PRIOR, VK_NEXT, VK_END, VK_HOME, VK_LEFT, VK_UP, VK_RIGHT, VK_DOWN, VK_INSERT, VK_DELETE,
    VK_SNAPSHOT, VK_LWIN, VK_RWIN, VK_APPS,
];

const FUNCTION_KEYS: [&str; 12] = [
    "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12",
];

static NAMED_KEYS: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map = HashMap::from([
        ("backspace", VK_BACK),
        ("tab", VK_TAB),
        ("enter", VK_RETURN),
        ("return", VK_RETURN),
        ("shift", VK_SHIFT),
        ("ctrl", VK_CONTROL),
        ("control", VK_CONTROL),
        ("alt", VK_MENU),
        ("menu", VK_MENU),
        ("esc", VK_ESCAPE),
        ("escape", VK_ESCAPE),
        ("space", VK_SPACE),
        ("pageup", VK_PRIOR),
        ("pagedown", VK_NEXT),
        ("end", VK_END),
        ("home", VK_HOME),
        ("left", VK_LEFT),
        ("up", VK_UP),
        ("right", VK_RIGHT),
        ("down", VK_DOWN),
        ("printscreen", VK_SNAPSHOT),
        ("insert", VK_INSERT),
        ("delete", VK_DELETE),
        ("lwin", VK_LWIN),
        ("rwin", VK_RWIN),
        ("apps", VK_APPS),
        ("lshift", VK_LSHIFT),
        ("rshift", VK_RSHIFT),
        ("lctrl", VK_LCONTROL),
        ("rctrl", VK_RCONTROL),
        ("lalt", VK_LMENU),
        ("ralt", VK_RMENU),
    ]);
    for (offset, name) in FUNCTION_KEYS.iter().enumerate() {
        map.insert(*name, VK_F1 + offset as u16);
    }
    map
});

/// Whether `vk` must carry the extended-key flag
pub fn is_extended(vk: u16) -> bool {
    EXTENDED_KEYS.contains(&vk)
}

/// Resolve a host key name to its virtual-key code
///
/// Single letters and digits map to their ASCII upper-case code, the rest go
/// through the named table. Matching is case-insensitive.
pub fn vk_from_name(name: &str) -> Result<u16, InputError> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Ok(c.to_ascii_uppercase() as u16);
        }
    }

    NAMED_KEYS
        .get(trimmed.to_ascii_lowercase().as_str())
        .copied()
        .ok_or_else(|| InputError::UnknownKey(name.to_string()))
}
