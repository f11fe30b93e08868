//! Boot-protocol scancode → input key code table.
//!
//! Index is the raw HID usage (Keyboard/Keypad page 0x07) found in a boot
//! report; value is the input-subsystem key code, or 0 for "no key".
//!
//! ```text
//! 0x00-0x03  reserved (no event, rollover, POST fail, undefined)
//! 0x04-0x94  alphanumerics, punctuation, F-keys, keypad, international
//! 0xE0-0xE7  modifiers (mirrors byte 0 of the report)
//! 0xE8-0xFB  vendor multimedia / consumer extension
//! ```

use crate::config::{MODIFIER_COUNT, MODIFIER_SCANCODE_BASE};

/// Input-subsystem key code (`KEY_*` numbering).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const ESC: KeyCode = KeyCode(1);
    pub const ENTER: KeyCode = KeyCode(28);
    pub const A: KeyCode = KeyCode(30);
    pub const B: KeyCode = KeyCode(48);
    pub const CAPS_LOCK: KeyCode = KeyCode(58);
    pub const NUM_LOCK: KeyCode = KeyCode(69);
    pub const SCROLL_LOCK: KeyCode = KeyCode(70);

    pub const LEFT_CTRL: KeyCode = KeyCode(29);
    pub const LEFT_SHIFT: KeyCode = KeyCode(42);
    pub const LEFT_ALT: KeyCode = KeyCode(56);
    pub const LEFT_META: KeyCode = KeyCode(125);
    pub const RIGHT_CTRL: KeyCode = KeyCode(97);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(54);
    pub const RIGHT_ALT: KeyCode = KeyCode(100);
    pub const RIGHT_META: KeyCode = KeyCode(126);

    /// Raw key code value.
    pub const fn code(self) -> u16 {
        self.0
    }
}

#[rustfmt::skip]
static SCANCODE_TABLE: [u8; 256] = [
      0,   0,   0,   0,  30,  48,  46,  32,  18,  33,  34,  35,  23,  36,  37,  38,  // 0x00
     50,  49,  24,  25,  16,  19,  31,  20,  22,  47,  17,  45,  21,  44,   2,   3,  // 0x10
      4,   5,   6,   7,   8,   9,  10,  11,  28,   1,  14,  15,  57,  12,  13,  26,  // 0x20
     27,  43,  43,  39,  40,  41,  51,  52,  53,  58,  59,  60,  61,  62,  63,  64,  // 0x30
     65,  66,  67,  68,  87,  88,  99,  70, 119, 110, 102, 104, 111, 107, 109, 106,  // 0x40
    105, 108, 103,  69,  98,  55,  74,  78,  96,  79,  80,  81,  75,  76,  77,  71,  // 0x50
     72,  73,  82,  83,  86, 127, 116, 117, 183, 184, 185, 186, 187, 188, 189, 190,  // 0x60
    191, 192, 193, 194, 134, 138, 130, 132, 128, 129, 131, 137, 133, 135, 136, 113,  // 0x70
    115, 114,   0,   0,   0, 121,   0,  89,  93, 124,  92,  94,  95,   0,   0,   0,  // 0x80
    122, 123,  90,  91,  85,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,  // 0x90
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,  // 0xA0
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,  // 0xB0
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,  // 0xC0
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,  // 0xD0
     29,  42,  56, 125,  97,  54, 100, 126, 164, 166, 165, 163, 161, 115, 114, 113,  // 0xE0
    150, 158, 159, 128, 136, 177, 178, 176, 142, 152, 173, 140,   0,   0,   0,   0,  // 0xF0
];

/// Translate a raw scancode. Total and side-effect free.
///
/// Returns `None` for reserved, unassigned, and rollover (`0x01`) scancodes.
#[inline]
pub fn translate(scancode: u8) -> Option<KeyCode> {
    match SCANCODE_TABLE[scancode as usize] {
        0 => None,
        code => Some(KeyCode(code as u16)),
    }
}

/// Key for modifier bit `bit` (0 = Left Ctrl ... 7 = Right GUI).
///
/// `bit` is taken modulo 8.
pub fn modifier_key(bit: u8) -> KeyCode {
    let scancode = MODIFIER_SCANCODE_BASE + (bit % MODIFIER_COUNT as u8);
    KeyCode(SCANCODE_TABLE[scancode as usize] as u16)
}

/// Set of key codes a boot keyboard can emit, as advertised to the input
/// layer at attach time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCapabilities {
    bits: [u32; 8],
}

impl KeyCapabilities {
    /// Every key code present in the scancode table. Code 0 is never set.
    pub fn from_table() -> Self {
        let mut bits = [0u32; 8];
        for &code in SCANCODE_TABLE.iter() {
            bits[(code / 32) as usize] |= 1u32 << (code % 32);
        }
        bits[0] &= !1u32;
        Self { bits }
    }

    pub fn contains(&self, key: KeyCode) -> bool {
        match key.0 {
            1..=255 => self.bits[(key.0 / 32) as usize] & (1u32 << (key.0 % 32)) != 0,
            _ => false,
        }
    }

    /// Number of distinct key codes in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw 256-bit map, word 0 bit 0 = key code 0.
    pub fn as_words(&self) -> &[u32; 8] {
        &self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_scancodes_have_no_key() {
        for sc in 0..=3u8 {
            assert_eq!(translate(sc), None, "scancode {:#x}", sc);
        }
    }

    #[test]
    fn rollover_sentinel_is_untranslated() {
        assert_eq!(translate(crate::config::ROLLOVER_SCANCODE), None);
    }

    #[test]
    fn letters_and_controls() {
        assert_eq!(translate(0x04), Some(KeyCode::A));
        assert_eq!(KeyCode::A.code(), 30);
        assert_eq!(translate(0x05), Some(KeyCode::B));
        assert_eq!(translate(0x28), Some(KeyCode::ENTER));
        assert_eq!(translate(0x29), Some(KeyCode::ESC));
        assert_eq!(translate(0x39), Some(KeyCode::CAPS_LOCK));
        assert_eq!(translate(0x53), Some(KeyCode::NUM_LOCK));
        assert_eq!(translate(0x47), Some(KeyCode::SCROLL_LOCK));
    }

    #[test]
    fn modifier_range_matches_modifier_bits() {
        let expected = [
            KeyCode::LEFT_CTRL,
            KeyCode::LEFT_SHIFT,
            KeyCode::LEFT_ALT,
            KeyCode::LEFT_META,
            KeyCode::RIGHT_CTRL,
            KeyCode::RIGHT_SHIFT,
            KeyCode::RIGHT_ALT,
            KeyCode::RIGHT_META,
        ];
        for (bit, key) in expected.iter().enumerate() {
            assert_eq!(modifier_key(bit as u8), *key);
            assert_eq!(translate(0xE0 + bit as u8), Some(*key));
        }
    }

    #[test]
    fn vendor_extension_range_is_mapped() {
        // 0xE8 = play/pause, 0xFB = calc
        assert_eq!(translate(0xE8), Some(KeyCode(164)));
        assert_eq!(translate(0xFB), Some(KeyCode(140)));
        for sc in 0xFC..=0xFFu8 {
            assert_eq!(translate(sc), None);
        }
    }

    #[test]
    fn unassigned_gap_is_empty() {
        for sc in 0xA5..=0xDFu8 {
            assert_eq!(translate(sc), None, "scancode {:#x}", sc);
        }
    }

    #[test]
    fn capabilities_cover_every_table_entry() {
        let caps = KeyCapabilities::from_table();
        for sc in 0..=255u8 {
            if let Some(key) = translate(sc) {
                assert!(caps.contains(key), "missing {:?}", key);
            }
        }
        assert!(!caps.contains(KeyCode(0)));
        assert!(!caps.contains(KeyCode(300)));
        assert!(!caps.is_empty());

        let words = caps.as_words();
        assert_eq!(words[0] & 1, 0);
        let ones: usize = words.iter().map(|w| w.count_ones() as usize).sum();
        assert_eq!(ones, caps.len());
    }
}
