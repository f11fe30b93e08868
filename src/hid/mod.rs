//! Boot-protocol keyboard report decoding.

pub mod diff;
pub mod keymap;
pub mod report;


pub use diff::{diff, DiffEvent, DiffEvents, KeyState, KeyTransition};
pub use keymap::{translate, KeyCapabilities, KeyCode};
pub use report::BootReport;
