//! Device identity and input event records
//!
//! Every injected event carries the vendor/product pair of a physical
//! device in the platform's opaque "extra info" slot.

use serde::{Deserialize, Serialize};

/// Vendor/product identifier pair of an input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// USB vendor id
    pub vendor_id: u16,
    /// USB product id
    pub product_id: u16,
}

impl DeviceIdentity {
    /// Razer Huntsman V3 Pro Tenkeyless (`HID\VID_1532&PID_02A7`)
    pub const RAZER_HUNTSMAN_V3_PRO: Self = Self::new(0x1532, 0x02A7);

    /// Logitech unifying receiver (`HID\VID_046D&PID_C547`)
    pub const LOGITECH_RECEIVER: Self = Self::new(0x046D, 0xC547);

    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }

    /// Payload for the event's extra-info field: `[VID:16][PID:16]`
    pub const fn extra_info(&self) -> u32 {
        ((self.vendor_id as u32) << 16) | self.product_id as u32
    }

    /// An identity with both halves zero would mark the event as synthetic
    pub const fn is_valid(&self) -> bool {
        self.vendor_id != 0 && self.product_id != 0
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VID:0x{:04X}, PID:0x{:04X}", self.vendor_id, self.product_id)
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parse the host's button names; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(MouseButton::Left),
            "right" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Kind-specific payload of an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Keyboard key transition
    Key {
        virtual_code: u16,
        scan_code: u16,
        down: bool,
        extended: bool,
    },
    /// Absolute move in normalized 0..=65535 space
    MouseMove { abs_x: i32, abs_y: i32 },
    /// Relative move in mickeys
    MouseDelta { dx: i32, dy: i32 },
    /// Button transition at the current position
    MouseButton { button: MouseButton, down: bool },
}

/// A single input record ready for submission
///
/// Constructed once, submitted once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    kind: EventKind,
    identity: DeviceIdentity,
}

impl InputEvent {
    pub fn new(kind: EventKind, identity: DeviceIdentity) -> Self {
        Self { kind, identity }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    pub fn extra_info(&self) -> u32 {
        self.identity.extra_info()
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self.kind, EventKind::Key { .. })
    }
}
