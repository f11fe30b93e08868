//! Indicator (LED) synchronisation.
//!
//! Keeps at most one indicator write outstanding per device, and makes the
//! device converge on the most recently requested byte:
//!
//! ```text
//!            request(d != transmitted) / submit d
//!   ┌──────┐ ─────────────────────────────────────▶ ┌─────────┐
//!   │ Idle │                                        │ Pending │ ◀─┐ completion,
//!   └──────┘ ◀───────────────────────────────────── └─────────┘ ──┘ desired moved:
//!            completion, desired == transmitted                     submit desired
//! ```
//!
//! Requests arriving while `Pending` only overwrite `desired`; intermediate
//! values are never sent. Requests and completions race from different
//! contexts, so all state lives behind one `blocking_mutex::Mutex` and the
//! write is submitted while it is held.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::INDICATOR_MASK;
use crate::error::{Error, SubmitError};
use crate::transport::{IndicatorPipe, TransferStatus};

/// Indicator byte as carried by the boot-protocol output report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicators(u8);

impl Indicators {
    pub const NONE: Indicators = Indicators(0);
    pub const NUM_LOCK: Indicators = Indicators(1 << 0);
    pub const CAPS_LOCK: Indicators = Indicators(1 << 1);
    pub const SCROLL_LOCK: Indicators = Indicators(1 << 2);
    pub const COMPOSE: Indicators = Indicators(1 << 3);
    pub const KANA: Indicators = Indicators(1 << 4);

    /// Keep only the five defined indicator bits.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Indicators(bits & INDICATOR_MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Indicators) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn set(&mut self, other: Indicators, on: bool) {
        if on {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    #[must_use]
    pub const fn with(self, other: Indicators) -> Self {
        Indicators(self.0 | other.0)
    }
}

/// Idle: nothing outstanding. Pending: exactly one write outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Idle,
    Pending,
}

/// Shared indicator state. Only ever touched under the `IndicatorSync` lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorState {
    transmitted: u8,
    desired: u8,
    acknowledged: u8,
    in_flight: bool,
}

impl IndicatorState {
    const fn new() -> Self {
        Self {
            transmitted: 0,
            desired: 0,
            acknowledged: 0,
            in_flight: false,
        }
    }

    /// Last byte sent, or the byte currently in flight.
    pub fn transmitted(&self) -> u8 {
        self.transmitted
    }

    /// Most recently requested byte.
    pub fn desired(&self) -> u8 {
        self.desired
    }

    /// Last byte whose write completion was observed.
    pub fn acknowledged(&self) -> u8 {
        self.acknowledged
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight {
            Phase::Pending
        } else {
            Phase::Idle
        }
    }

    /// Send `desired`, rolling `transmitted` back if the transport refuses it.
    fn submit<P: IndicatorPipe + ?Sized>(&mut self, pipe: &mut P) -> Result<(), SubmitError> {
        let sent = self.transmitted;
        self.transmitted = self.desired;
        match pipe.submit_write(self.desired) {
            Ok(()) => {
                self.in_flight = true;
                Ok(())
            }
            Err(e) => {
                self.transmitted = sent;
                self.in_flight = false;
                Err(e)
            }
        }
    }
}

/// Result of [`IndicatorSync::request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestOutcome {
    /// A write of the new byte was submitted.
    Submitted,
    /// A write is already outstanding; its completion will send the new byte.
    Coalesced,
    /// Idle and already showing the requested byte.
    Unchanged,
}

/// Result of [`IndicatorSync::on_completion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompletionOutcome {
    /// Device has the latest byte; back to idle.
    Settled,
    /// A newer byte was requested in flight and has been submitted.
    Resubmitted,
    /// No write was outstanding; ignored.
    Spurious,
}

/// Indicator state machine for one device.
///
/// `M` selects the critical-section flavour; use `CriticalSectionRawMutex`
/// when requests and completions run in different interrupt priorities or
/// threads.
pub struct IndicatorSync<M: RawMutex> {
    state: Mutex<M, RefCell<IndicatorState>>,
}

impl<M: RawMutex> IndicatorSync<M> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(IndicatorState::new())),
        }
    }

    /// Ask for the device's indicators to become `desired`.
    ///
    /// Never blocks. A submission failure leaves the machine idle and
    /// unconverged; a later request for the same byte will try again.
    pub fn request<P>(&self, desired: u8, pipe: &mut P) -> Result<RequestOutcome, Error>
    where
        P: IndicatorPipe + ?Sized,
    {
        self.state.lock(|cell| {
            let mut s = cell.borrow_mut();
            s.desired = desired;

            if s.in_flight {
                return Ok(RequestOutcome::Coalesced);
            }
            if s.desired == s.transmitted {
                return Ok(RequestOutcome::Unchanged);
            }

            match s.submit(pipe) {
                Ok(()) => {
                    trace!("indicator write {:#x} submitted", desired);
                    Ok(RequestOutcome::Submitted)
                }
                Err(e) => {
                    error!("can't submit indicator write {:#x}: {}", desired, e);
                    Err(Error::Submit(e))
                }
            }
        })
    }

    /// Typed form of [`request`](Self::request).
    pub fn request_indicators<P>(
        &self,
        indicators: Indicators,
        pipe: &mut P,
    ) -> Result<RequestOutcome, Error>
    where
        P: IndicatorPipe + ?Sized,
    {
        self.request(indicators.bits(), pipe)
    }

    /// Completion of the outstanding write.
    ///
    /// A failed write is logged and otherwise treated as delivered; no
    /// rollback is attempted.
    pub fn on_completion<P>(
        &self,
        status: TransferStatus,
        pipe: &mut P,
    ) -> Result<CompletionOutcome, Error>
    where
        P: IndicatorPipe + ?Sized,
    {
        self.state.lock(|cell| {
            let mut s = cell.borrow_mut();

            if !s.in_flight {
                warn!("indicator completion with nothing in flight, status {}", status);
                return Ok(CompletionOutcome::Spurious);
            }
            if !status.is_ok() {
                warn!("indicator write failed, status {}", status);
            }
            s.acknowledged = s.transmitted;

            if s.transmitted == s.desired {
                s.in_flight = false;
                return Ok(CompletionOutcome::Settled);
            }

            match s.submit(pipe) {
                Ok(()) => Ok(CompletionOutcome::Resubmitted),
                Err(e) => {
                    error!("can't resubmit indicator write: {}", e);
                    Err(Error::Resubmit(e))
                }
            }
        })
    }

    /// Consistent copy of the state.
    pub fn snapshot(&self) -> IndicatorState {
        self.state.lock(|cell| *cell.borrow())
    }

    pub fn is_pending(&self) -> bool {
        self.snapshot().in_flight
    }

    /// Forget any outstanding write. Only valid once the transport has
    /// cancelled it.
    ///
    /// `desired` survives. `transmitted` falls back to the last acknowledged
    /// byte, so a later request for the cancelled value is sent again.
    pub fn reset(&self) {
        self.state.lock(|cell| {
            let mut s = cell.borrow_mut();
            if s.in_flight {
                debug!("indicator write {:#x} cancelled", s.transmitted);
            }
            s.in_flight = false;
            s.transmitted = s.acknowledged;
        })
    }
}

impl<M: RawMutex> Default for IndicatorSync<M> {
    fn default() -> Self {
        Self::new()
    }
}
