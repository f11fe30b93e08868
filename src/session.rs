//! Per-device report session: retains the last report and turns each
//! interrupt-in completion into sink events.
//!
//! The transport delivers at most one report completion per session at a
//! time, so the retained report needs no locking; `&mut self` is enough.

use crate::error::Error;
use crate::hid::{diff, BootReport, DiffEvent, DiffEvents};
use crate::transport::{EventSink, ReportPipe, StatusClass, TransferStatus};

/// What happened to a report completion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportOutcome {
    /// Report was diffed, events delivered, and the read resubmitted.
    Processed { events: DiffEvents },
    /// Transfer is being torn down; report ignored, nothing resubmitted.
    Dropped,
    /// Abnormal status; read resubmitted without diffing.
    Resubmitted,
}

/// Report-diff session state for one keyboard.
#[derive(Clone, Debug, Default)]
pub struct KeyboardSession {
    previous: BootReport,
}

impl KeyboardSession {
    pub const fn new() -> Self {
        Self {
            previous: BootReport::empty(),
        }
    }

    /// Last successfully processed report.
    pub fn previous(&self) -> &BootReport {
        &self.previous
    }

    /// Handle one interrupt-in completion.
    ///
    /// On success the events are delivered to `sink` in diff order, followed
    /// by a single `on_sync`, then `previous` is replaced and the read
    /// resubmitted. Resubmission failure is returned, not retried.
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
        match status.class() {
            StatusClass::Transient => {
                debug!("report dropped, status {}", status);
                return Ok(ReportOutcome::Dropped);
            }
            StatusClass::Resubmit => {
                debug!("report status {}, resubmitting", status);
                resubmit(pipe)?;
                return Ok(ReportOutcome::Resubmitted);
            }
            StatusClass::Success => {}
        }

        let current = BootReport::from_bytes(data).ok_or(Error::ShortReport { len: data.len() })?;

        let events = diff(&self.previous, &current);
        deliver(&events, sink);
        self.previous = current;

        resubmit(pipe)?;
        Ok(ReportOutcome::Processed { events })
    }
}

fn deliver<S: EventSink + ?Sized>(events: &DiffEvents, sink: &mut S) {
    for event in events.iter() {
        match *event {
            DiffEvent::Level(t) | DiffEvent::Edge(t) => sink.on_key_transition(t),
            DiffEvent::Unrecognized { scancode, state } => {
                info!("unknown scancode {:#x} {}", scancode, state);
                sink.on_unrecognized_scancode(scancode, state);
            }
        }
    }
    sink.on_sync();
}

fn resubmit<P: ReportPipe + ?Sized>(pipe: &mut P) -> Result<(), Error> {
    pipe.submit_read().map_err(|e| {
        error!("can't resubmit report read: {}", e);
        Error::Resubmit(e)
    })
}
