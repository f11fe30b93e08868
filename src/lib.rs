//! Boot-protocol keyboard core.
//!
//! Turns the 8-byte interrupt-in reports of a boot-protocol keyboard into
//! key press/release events, and keeps the keyboard's indicator LEDs in
//! sync with at most one output transfer in flight.
//!
//! The crate owns no transport. A driver shim implements
//! [`transport::ReportPipe`] / [`transport::IndicatorPipe`] over its host
//! controller, implements [`transport::EventSink`] over its input layer, and
//! routes completions into a [`device::KeyboardDevice`]:
//!
//! ```text
//!  interrupt-in completion ──▶ KeyboardDevice::on_report ──▶ EventSink
//!  EventSink LED change   ──▶ KeyboardDevice::set_indicator ──▶ IndicatorPipe
//!  LED write completion   ──▶ KeyboardDevice::on_indicator_complete
//! ```
//!
//! Usage: `cargo test` on the host; enable the `defmt` feature on target
//! for logging.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod config;
pub mod device;
pub mod error;
pub mod hid;
pub mod indicator;
pub mod session;
pub mod transport;

pub use device::KeyboardDevice;
pub use error::{Error, SubmitError};
pub use hid::{diff, translate, BootReport, DiffEvent, KeyCode, KeyState, KeyTransition};
pub use indicator::{CompletionOutcome, Indicators, IndicatorSync, RequestOutcome};
pub use session::{KeyboardSession, ReportOutcome};
pub use transport::{EventSink, IndicatorPipe, ReportPipe, StatusClass, TransferStatus};
