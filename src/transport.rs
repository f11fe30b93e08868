//! Collaborator seams: the transport that moves bytes, and the sink that
//! consumes decoded events.
//!
//! The core never allocates transfer buffers or talks to a host controller
//! directly. A driver-framework shim implements these traits and routes
//! completion callbacks back into [`KeyboardSession`](crate::session::KeyboardSession)
//! and [`IndicatorSync`](crate::indicator::IndicatorSync).

use crate::error::SubmitError;
use crate::hid::{KeyState, KeyTransition};

/// Completion status of an asynchronous transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferStatus {
    /// Transfer finished normally.
    Completed,
    /// Transfer was unlinked (cancelled) by its owner.
    ConnectionReset,
    /// Transfer was killed, or the endpoint no longer exists.
    NoEntry,
    /// Device or host controller is shutting down.
    Shutdown,
    /// Endpoint stalled.
    Stalled,
    /// Device sent more data than the buffer holds.
    Overflow,
    /// CRC, bit-stuffing, or other low-level protocol error.
    Protocol,
    /// Any other transport-specific code.
    Other(i32),
}

/// How a completion must be handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusClass {
    /// Payload is valid.
    Success,
    /// Transfer is being torn down. Drop it, do not resubmit.
    Transient,
    /// Payload is unusable, but the pipe is alive. Resubmit.
    Resubmit,
}

impl TransferStatus {
    pub fn class(self) -> StatusClass {
        match self {
            TransferStatus::Completed => StatusClass::Success,
            TransferStatus::ConnectionReset | TransferStatus::NoEntry | TransferStatus::Shutdown => {
                StatusClass::Transient
            }
            TransferStatus::Stalled
            | TransferStatus::Overflow
            | TransferStatus::Protocol
            | TransferStatus::Other(_) => StatusClass::Resubmit,
        }
    }

    pub fn is_ok(self) -> bool {
        self == TransferStatus::Completed
    }
}

/// Interrupt-in endpoint delivering boot reports.
pub trait ReportPipe {
    /// Queue the next report read. Completion is reported through
    /// `KeyboardSession::on_report`.
    fn submit_read(&mut self) -> Result<(), SubmitError>;
}

/// Output channel carrying the indicator byte.
///
/// Called from inside a critical section; implementations must only queue
/// the transfer and return, never wait for it.
pub trait IndicatorPipe {
    fn submit_write(&mut self, indicators: u8) -> Result<(), SubmitError>;
}

/// Consumer of decoded keyboard events.
pub trait EventSink {
    /// A key changed state (or a modifier level was re-asserted).
    fn on_key_transition(&mut self, transition: KeyTransition);

    /// A scancode changed state but has no key mapping.
    fn on_unrecognized_scancode(&mut self, scancode: u8, state: KeyState);

    /// End of one report's worth of events.
    fn on_sync(&mut self) {}
}

impl<T: ReportPipe + ?Sized> ReportPipe for &mut T {
    fn submit_read(&mut self) -> Result<(), SubmitError> {
        (**self).submit_read()
    }
}

impl<T: IndicatorPipe + ?Sized> IndicatorPipe for &mut T {
    fn submit_write(&mut self, indicators: u8) -> Result<(), SubmitError> {
        (**self).submit_write(indicators)
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn on_key_transition(&mut self, transition: KeyTransition) {
        (**self).on_key_transition(transition)
    }

    fn on_unrecognized_scancode(&mut self, scancode: u8, state: KeyState) {
        (**self).on_unrecognized_scancode(scancode, state)
    }

    fn on_sync(&mut self) {
        (**self).on_sync()
    }
}
