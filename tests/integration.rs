//! Integration tests for bootkbd, driven only through the public API.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use bootkbd::{
    EventSink, IndicatorPipe, KeyCode, KeyState, KeyTransition, KeyboardDevice, ReportOutcome,
    ReportPipe, SubmitError, TransferStatus,
};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

type Keyboard = KeyboardDevice<CriticalSectionRawMutex>;

#[derive(Default)]
struct Reads(usize);

impl ReportPipe for Reads {
    fn submit_read(&mut self) -> Result<(), SubmitError> {
        self.0 += 1;
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Seen {
    Key(KeyTransition),
    Unknown(u8, KeyState),
    Sync,
}

#[derive(Default)]
struct Recorder(Vec<Seen>);

impl Recorder {
    fn edges(&self) -> Vec<KeyTransition> {
        // Every report starts with eight modifier levels; skip them.
        let mut out = Vec::new();
        let mut since_sync = 0;
        for seen in &self.0 {
            match seen {
                Seen::Sync => since_sync = 0,
                Seen::Key(t) => {
                    if since_sync >= 8 {
                        out.push(*t);
                    }
                    since_sync += 1;
                }
                Seen::Unknown(..) => since_sync += 1,
            }
        }
        out
    }
}

impl EventSink for Recorder {
    fn on_key_transition(&mut self, t: KeyTransition) {
        self.0.push(Seen::Key(t));
    }
    fn on_unrecognized_scancode(&mut self, scancode: u8, state: KeyState) {
        self.0.push(Seen::Unknown(scancode, state));
    }
    fn on_sync(&mut self) {
        self.0.push(Seen::Sync);
    }
}

fn opened() -> (Keyboard, Reads) {
    let mut kbd = Keyboard::new();
    let mut reads = Reads::default();
    kbd.open(&mut reads).expect("open");
    (kbd, reads)
}

// ═══════════════════════════════════════════════════════════════════════════
// Report path
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn typing_sequence_produces_press_release_stream() {
    let (mut kbd, mut reads) = opened();
    let mut sink = Recorder::default();

    let reports: [[u8; 8]; 5] = [
        [0x02, 0, 0x04, 0, 0, 0, 0, 0], // Shift + a
        [0x02, 0, 0x04, 0x05, 0, 0, 0, 0], // + b
        [0x00, 0, 0x05, 0, 0, 0, 0, 0], // release a and Shift
        [0x00, 0, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01], // rollover
        [0x00, 0, 0, 0, 0, 0, 0, 0],    // all up
    ];
    for r in &reports {
        kbd.on_report(TransferStatus::Completed, r, &mut reads, &mut sink)
            .unwrap();
    }

    assert_eq!(
        sink.edges(),
        vec![
            KeyTransition::new(KeyCode::A, KeyState::Pressed),
            KeyTransition::new(KeyCode::B, KeyState::Pressed),
            KeyTransition::new(KeyCode::A, KeyState::Released),
            KeyTransition::new(KeyCode::B, KeyState::Released),
        ]
    );
    assert_eq!(sink.0.iter().filter(|s| **s == Seen::Sync).count(), 5);
    // One read at open plus one per processed report.
    assert_eq!(reads.0, 6);
    assert!(kbd.session().previous().is_empty());
}

#[test]
fn transient_error_between_reports_is_invisible() {
    let (mut kbd, mut reads) = opened();
    let mut sink = Recorder::default();

    kbd.on_report(
        TransferStatus::Completed,
        &[0, 0, 0x04, 0, 0, 0, 0, 0],
        &mut reads,
        &mut sink,
    )
    .unwrap();
    let out = kbd
        .on_report(
            TransferStatus::ConnectionReset,
            &[0, 0, 0, 0, 0, 0, 0, 0],
            &mut reads,
            &mut sink,
        )
        .unwrap();
    assert_eq!(out, ReportOutcome::Dropped);
    kbd.on_report(
        TransferStatus::Completed,
        &[0, 0, 0x04, 0, 0, 0, 0, 0],
        &mut reads,
        &mut sink,
    )
    .unwrap();

    assert_eq!(
        sink.edges(),
        vec![KeyTransition::new(KeyCode::A, KeyState::Pressed)]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Indicator path
// ═══════════════════════════════════════════════════════════════════════════

/// Transport double shared between the requesting and completing threads.
#[derive(Default)]
struct LedLine {
    outstanding: AtomicUsize,
    max_outstanding: AtomicUsize,
    sent: Mutex<Vec<u8>>,
}

struct LedHandle<'a>(&'a LedLine);

impl IndicatorPipe for LedHandle<'_> {
    fn submit_write(&mut self, indicators: u8) -> Result<(), SubmitError> {
        self.0.sent.lock().unwrap().push(indicators);
        let now = self.0.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.max_outstanding.fetch_max(now, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn superseded_request_is_sent_once_after_completion() {
    let kbd = Keyboard::new();
    let line = LedLine::default();
    let mut pipe = LedHandle(&line);

    kbd.set_indicator(0x01, &mut pipe).unwrap();
    kbd.set_indicator(0x02, &mut pipe).unwrap();
    assert_eq!(*line.sent.lock().unwrap(), vec![0x01]);

    line.outstanding.fetch_sub(1, Ordering::SeqCst);
    kbd.on_indicator_complete(TransferStatus::Completed, &mut pipe)
        .unwrap();
    assert_eq!(*line.sent.lock().unwrap(), vec![0x01, 0x02]);

    line.outstanding.fetch_sub(1, Ordering::SeqCst);
    kbd.on_indicator_complete(TransferStatus::Completed, &mut pipe)
        .unwrap();

    let s = kbd.indicator_state();
    assert_eq!(s.transmitted(), 0x02);
    assert!(!s.in_flight());
    assert_eq!(line.max_outstanding.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_requests_and_completions_converge() {
    const ROUNDS: usize = 2_000;

    let kbd = Keyboard::new();
    let line = LedLine::default();
    let done = AtomicBool::new(false);
    let last = (ROUNDS % 31) as u8 | 0x01;

    thread::scope(|scope| {
        scope.spawn(|| {
            let mut pipe = LedHandle(&line);
            for i in 0..ROUNDS {
                let _ = kbd.set_indicator((i % 31) as u8, &mut pipe);
            }
            kbd.set_indicator(last, &mut pipe).unwrap();
            done.store(true, Ordering::SeqCst);
        });

        scope.spawn(|| {
            let mut pipe = LedHandle(&line);
            loop {
                // Read `done` first: once set, every write it covers is
                // already counted in `outstanding`.
                let finished = done.load(Ordering::SeqCst);
                if line.outstanding.load(Ordering::SeqCst) > 0 {
                    line.outstanding.fetch_sub(1, Ordering::SeqCst);
                    kbd.on_indicator_complete(TransferStatus::Completed, &mut pipe)
                        .unwrap();
                } else if finished {
                    break;
                } else {
                    thread::yield_now();
                }
            }
        });
    });

    let s = kbd.indicator_state();
    assert_eq!(s.transmitted(), last);
    assert_eq!(s.desired(), last);
    assert!(!s.in_flight());
    assert_eq!(line.max_outstanding.load(Ordering::SeqCst), 1);
    assert_eq!(line.sent.lock().unwrap().last(), Some(&last));
}
