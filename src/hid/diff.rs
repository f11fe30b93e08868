//! Report differ: two consecutive boot reports → ordered key events.
//!
//! Output order is fixed:
//!
//! 1. Eight modifier *levels*, bit 0 first. Re-emitted on every report
//!    whether or not they changed; the input layer treats a repeated
//!    "pressed" as a key-repeat tick.
//! 2. Releases: scancodes held in `previous` but not in `current`.
//! 3. Presses: scancodes held in `current` but not in `previous`.
//!
//! Scancodes `0..=3` (including the `0x01` rollover sentinel) are never
//! diffed.

use heapless::Vec;

use super::keymap::{self, KeyCode};
use super::report::BootReport;
use crate::config::{MAX_DIFF_EVENTS, MODIFIER_COUNT, RESERVED_SCANCODE_MAX};

/// Direction of a key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    Released,
    Pressed,
}

impl KeyState {
    pub fn from_level(level: bool) -> Self {
        if level {
            KeyState::Pressed
        } else {
            KeyState::Released
        }
    }

    pub fn is_pressed(self) -> bool {
        self == KeyState::Pressed
    }
}

/// A key changing (or re-asserting) state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyTransition {
    pub key: KeyCode,
    pub state: KeyState,
}

impl KeyTransition {
    pub const fn new(key: KeyCode, state: KeyState) -> Self {
        Self { key, state }
    }
}

/// One item of diff output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiffEvent {
    /// Modifier level, reported every call.
    Level(KeyTransition),
    /// Non-modifier key press or release.
    Edge(KeyTransition),
    /// Scancode changed state but has no table entry.
    Unrecognized { scancode: u8, state: KeyState },
}

impl DiffEvent {
    /// The key transition carried by this event, if any.
    pub fn transition(&self) -> Option<KeyTransition> {
        match *self {
            DiffEvent::Level(t) | DiffEvent::Edge(t) => Some(t),
            DiffEvent::Unrecognized { .. } => None,
        }
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, DiffEvent::Edge(_))
    }

    pub fn is_level(&self) -> bool {
        matches!(self, DiffEvent::Level(_))
    }
}

/// Bounded diff output; capacity covers the worst case, so pushes never fail.
pub type DiffEvents = Vec<DiffEvent, MAX_DIFF_EVENTS>;

/// Compute the events that take the input layer from `previous` to `current`.
///
/// Pure: the caller keeps `previous` and replaces it with `current` once
/// the report has been fully processed.
pub fn diff(previous: &BootReport, current: &BootReport) -> DiffEvents {
    let mut events = DiffEvents::new();

    for bit in 0..MODIFIER_COUNT as u8 {
        let state = KeyState::from_level(current.modifier_bit(bit));
        push(
            &mut events,
            DiffEvent::Level(KeyTransition::new(keymap::modifier_key(bit), state)),
        );
    }

    for &sc in previous.keycodes.iter() {
        if is_key_scancode(sc) && !current.holds(sc) {
            push(&mut events, edge(sc, KeyState::Released));
        }
    }

    for &sc in current.keycodes.iter() {
        if is_key_scancode(sc) && !previous.holds(sc) {
            push(&mut events, edge(sc, KeyState::Pressed));
        }
    }

    events
}

/// At most 8 levels, 6 releases and 6 presses per diff.
fn push(events: &mut DiffEvents, event: DiffEvent) {
    if events.push(event).is_err() {
        unreachable!("diff output exceeds MAX_DIFF_EVENTS");
    }
}

#[inline]
fn is_key_scancode(sc: u8) -> bool {
    sc > RESERVED_SCANCODE_MAX
}

fn edge(scancode: u8, state: KeyState) -> DiffEvent {
    match keymap::translate(scancode) {
        Some(key) => DiffEvent::Edge(KeyTransition::new(key, state)),
        None => DiffEvent::Unrecognized { scancode, state },
    }
}
