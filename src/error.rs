//! Unified error type for bootkbd.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

use core::fmt;

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Report path
    /// A report completion carried fewer than 8 bytes.
    ShortReport {
        /// Number of bytes actually delivered.
        len: usize,
    },

    /// A report was delivered to a device that is not open.
    NotOpen,

    /// The initial read could not be submitted when opening the device.
    Io(SubmitError),

    // Transport
    /// Submitting an indicator write at request time failed.
    Submit(SubmitError),

    /// Resubmitting a transfer from a completion context failed.
    /// Not retried here; the owner decides whether to tear down.
    Resubmit(SubmitError),
}

/// Transport-level submission failure (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubmitError {
    /// Raw status code from the host-controller / transport layer.
    Raw(i32),
    /// The device has gone away.
    NoDevice,
    /// The transfer is still owned by the transport.
    Busy,
}

// Convenience conversions

impl From<SubmitError> for Error {
    fn from(e: SubmitError) -> Self {
        Error::Submit(e)
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Raw(code) => write!(f, "transport status {}", code),
            SubmitError::NoDevice => f.write_str("no device"),
            SubmitError::Busy => f.write_str("transfer busy"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShortReport { len } => write!(f, "short report ({} bytes)", len),
            Error::NotOpen => f.write_str("device not open"),
            Error::Io(e) => write!(f, "can't submit initial read: {}", e),
            Error::Submit(e) => write!(f, "can't submit indicator write: {}", e),
            Error::Resubmit(e) => write!(f, "can't resubmit transfer: {}", e),
        }
    }
}
