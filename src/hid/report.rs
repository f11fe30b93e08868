//! Boot-protocol keyboard input report.
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (ignored)
//! Byte 2-7: Up to 6 simultaneous scancodes, zero padded, any order.
//!           0x01 in every slot = rollover (too many keys held).
//! ```

use crate::config::{KEY_SLOTS, KEY_SLOT_OFFSET, REPORT_SIZE};

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (vendor garbage tolerated).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed scancodes.
    pub keycodes: [u8; KEY_SLOTS],
}

impl BootReport {
    /// All-keys-released report. Also the session's starting state.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; KEY_SLOTS],
        }
    }

    /// Build from an exact 8-byte array.
    pub const fn from_array(raw: [u8; REPORT_SIZE]) -> Self {
        Self {
            modifier: raw[0],
            reserved: raw[1],
            keycodes: [raw[2], raw[3], raw[4], raw[5], raw[6], raw[7]],
        }
    }

    /// Parse from the bytes of a completed interrupt-in transfer.
    ///
    /// Some devices pad the endpoint beyond 8 bytes; the tail is ignored.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < REPORT_SIZE {
            return None;
        }
        let mut raw = [0u8; REPORT_SIZE];
        raw.copy_from_slice(&data[..REPORT_SIZE]);
        Some(Self::from_array(raw))
    }

    /// Serialise back into the 8-byte wire layout.
    pub fn to_array(&self) -> [u8; REPORT_SIZE] {
        let mut buf = [0u8; REPORT_SIZE];
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[KEY_SLOT_OFFSET..].copy_from_slice(&self.keycodes);
        buf
    }

    /// Level of modifier bit `bit` (0-7).
    #[inline]
    pub fn modifier_bit(&self, bit: u8) -> bool {
        (self.modifier >> bit) & 1 != 0
    }

    /// Whether `scancode` occupies any of the six key slots.
    #[inline]
    pub fn holds(&self, scancode: u8) -> bool {
        self.keycodes.iter().any(|&k| k == scancode)
    }

    /// Returns `true` if no keys or modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

impl From<[u8; REPORT_SIZE]> for BootReport {
    fn from(raw: [u8; REPORT_SIZE]) -> Self {
        Self::from_array(raw)
    }
}
