//! One attached boot keyboard: report session + indicator state machine.
//!
//! Constructed by the driver shim at attach time and dropped at detach.
//! The report path takes `&mut self`; the indicator path takes `&self` so it
//! can be driven from the sink's context and the transport's completion
//! context concurrently.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::error::Error;
use crate::hid::KeyCapabilities;
use crate::indicator::{CompletionOutcome, IndicatorState, IndicatorSync, RequestOutcome};
use crate::session::{KeyboardSession, ReportOutcome};
use crate::transport::{EventSink, IndicatorPipe, ReportPipe, TransferStatus};

pub struct KeyboardDevice<M: RawMutex> {
    session: KeyboardSession,
    indicators: IndicatorSync<M>,
    capabilities: KeyCapabilities,
    open: bool,
}

impl<M: RawMutex> KeyboardDevice<M> {
    pub fn new() -> Self {
        Self {
            session: KeyboardSession::new(),
            indicators: IndicatorSync::new(),
            capabilities: KeyCapabilities::from_table(),
            open: false,
        }
    }

    /// Start streaming reports by submitting the first read.
    pub fn open<P: ReportPipe + ?Sized>(&mut self, pipe: &mut P) -> Result<(), Error> {
        if self.open {
            return Ok(());
        }
        pipe.submit_read().map_err(|e| {
            error!("can't submit initial report read: {}", e);
            Error::Io(e)
        })?;
        self.open = true;
        info!("boot keyboard opened");
        Ok(())
    }

    /// Stop accepting reports. The transport must already have killed its
    /// outstanding transfers.
    pub fn close(&mut self) {
        self.open = false;
        self.indicators.reset();
        info!("boot keyboard closed");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Report-read completion.
    pub fn on_report<P, S>(
        &mut self,
        status: TransferStatus,
        data: &[u8],
        pipe: &mut P,
        sink: &mut S,
    ) -> Result<ReportOutcome, Error>
    where
        P: ReportPipe + ?Sized,
        S: EventSink + ?Sized,
    {
        if !self.open {
            return Err(Error::NotOpen);
        }
        self.session.on_report(status, data, pipe, sink)
    }

    /// Sink-facing entry point: make the device show `desired`.
    pub fn set_indicator<P>(&self, desired: u8, pipe: &mut P) -> Result<RequestOutcome, Error>
    where
        P: IndicatorPipe + ?Sized,
    {
        self.indicators.request(desired, pipe)
    }

    /// Indicator-write completion.
    pub fn on_indicator_complete<P>(
        &self,
        status: TransferStatus,
        pipe: &mut P,
    ) -> Result<CompletionOutcome, Error>
    where
        P: IndicatorPipe + ?Sized,
    {
        self.indicators.on_completion(status, pipe)
    }

    pub fn indicator_state(&self) -> IndicatorState {
        self.indicators.snapshot()
    }

    pub fn session(&self) -> &KeyboardSession {
        &self.session
    }

    pub fn indicators(&self) -> &IndicatorSync<M> {
        &self.indicators
    }

    /// Keys this device can emit.
    pub fn capabilities(&self) -> &KeyCapabilities {
        &self.capabilities
    }
}

impl<M: RawMutex> Default for KeyboardDevice<M> {
    fn default() -> Self {
        Self::new()
    }
}
