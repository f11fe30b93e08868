//! Boot-protocol constants and compile-time configuration.
//!
//! Report layout, reserved scancode ranges, and bounded-buffer sizes
//! live here so they can be tuned in one place.

// Input report

/// Boot-protocol keyboard input report size in bytes.
pub const REPORT_SIZE: usize = 8;

/// Number of concurrently reportable non-modifier scancodes (bytes 2-7).
pub const KEY_SLOTS: usize = 6;

/// Offset of the first scancode slot inside the report.
pub const KEY_SLOT_OFFSET: usize = 2;

/// Number of modifier bits in byte 0.
pub const MODIFIER_COUNT: usize = 8;

/// Scancode of modifier bit 0 (Left Control). Bits 1-7 follow contiguously.
pub const MODIFIER_SCANCODE_BASE: u8 = 0xE0;

// Reserved scancodes

/// "Phantom" scancode sent in every slot when more keys are held than
/// the report can carry.
pub const ROLLOVER_SCANCODE: u8 = 0x01;

/// Scancodes `0..=RESERVED_SCANCODE_MAX` never denote a real key and are
/// skipped by the differ (no-event, rollover, POST fail, undefined).
pub const RESERVED_SCANCODE_MAX: u8 = 0x03;

// Indicators

/// Indicator bits the output report carries (Num, Caps, Scroll, Compose, Kana).
pub const INDICATOR_MASK: u8 = 0x1F;

// Diff output

/// Upper bound on events a single diff can produce:
/// 8 modifier levels + 6 releases + 6 presses.
pub const MAX_DIFF_EVENTS: usize = MODIFIER_COUNT + 2 * KEY_SLOTS;
