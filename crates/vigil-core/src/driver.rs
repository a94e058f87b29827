//! Tick Driver
//!
//! The only component with scheduling authority. Reads the latest gaze
//! sample from a single-slot mailbox (last-value-wins, no queueing) and
//! advances the session on a fixed cadence. Stopping the driver halts all
//! state evolution immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::domain::RawSample;
use crate::events::EventSink;
use crate::session::{ObservationSession, TickReport};

/// Default tick interval, milliseconds.
pub const DEFAULT_TICK_MS: u64 = 50;

/// Single-slot mailbox between the asynchronous gaze source and the tick
/// loop. The driver reads non-destructively; a tick that finds no new
/// sample simply reuses the previous smoothed point.
#[derive(Debug, Clone, Default)]
pub struct SampleMailbox {
    slot: Arc<Mutex<Option<RawSample>>>,
}

impl SampleMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called from the gaze source at its own cadence; overwrites any
    /// unread sample.
    pub fn publish(&self, sample: RawSample) {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(sample);
    }

    /// Latest sample, if any; does not consume it.
    pub fn latest(&self) -> Option<RawSample> {
        *self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle for stopping a running driver from another thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

pub struct TickDriver {
    session: ObservationSession,
    mailbox: SampleMailbox,
    interval: Duration,
    stop: Arc<AtomicBool>,
}

impl TickDriver {
    pub fn new(session: ObservationSession, mailbox: SampleMailbox) -> Self {
        Self::with_interval(session, mailbox, Duration::from_millis(DEFAULT_TICK_MS))
    }

    pub fn with_interval(
        session: ObservationSession,
        mailbox: SampleMailbox,
        interval: Duration,
    ) -> Self {
        Self {
            session,
            mailbox,
            interval,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: self.stop.clone(),
        }
    }

    pub fn session(&self) -> &ObservationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ObservationSession {
        &mut self.session
    }

    /// Advance exactly one tick at the given clock time. Exposed so tests
    /// and display-synchronized callers can drive the cadence themselves.
    pub fn step(&mut self, now_ms: i64, sink: &mut dyn EventSink) -> TickReport {
        let raw = self.mailbox.latest();
        self.session.tick(raw, now_ms, sink)
    }

    /// Blocking fixed-interval loop; returns once the stop handle fires.
    /// The session is shut down on exit so late one-shot callbacks are
    /// dropped rather than delivered.
    pub fn run(&mut self, sink: &mut dyn EventSink) {
        let started = Instant::now();
        info!(interval_ms = self.interval.as_millis() as u64, "tick driver running");
        while !self.stop.load(Ordering::SeqCst) {
            let now_ms = started.elapsed().as_millis() as i64;
            self.step(now_ms, sink);
            thread::sleep(self.interval);
        }
        self.session.shutdown();
        info!("tick driver stopped");
    }

    /// Recover the session (for summary queries after a run).
    pub fn into_session(self) -> ObservationSession {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VigilConfig;
    use crate::domain::{Rect, RegionKind};
    use crate::events::RecordingSink;
    use crate::region::Region;
    use crate::session::Scene;

    fn driver() -> TickDriver {
        let mut session = ObservationSession::new(VigilConfig::default());
        session.start();
        session.set_scene(Scene::Observation {
            regions: vec![Region::fixed(
                "cam",
                RegionKind::Bedroom,
                Rect::new(0.0, 0.0, 200.0, 200.0),
            )],
        });
        TickDriver::new(session, SampleMailbox::new())
    }

    #[test]
    fn mailbox_is_last_value_wins() {
        let mb = SampleMailbox::new();
        assert!(mb.latest().is_none());
        mb.publish(RawSample::new(1.0, 1.0, 10));
        mb.publish(RawSample::new(2.0, 2.0, 20));
        let latest = mb.latest().unwrap();
        assert_eq!(latest.ts_ms, 20);
        // Non-destructive read.
        assert!(mb.latest().is_some());
    }

    #[test]
    fn step_reuses_stale_sample() {
        let mut d = driver();
        let mut sink = RecordingSink::default();
        d.mailbox.publish(RawSample::new(100.0, 100.0, 0));
        let r1 = d.step(0, &mut sink);
        assert!(r1.locked.is_some());
        // No new sample published: the tick still advances dwell.
        let r2 = d.step(50, &mut sink);
        let (_, dwell) = r2.locked.unwrap();
        assert!((dwell - 0.05).abs() < 1e-6);
    }

    #[test]
    fn stop_handle_halts_run() {
        let mut d = driver();
        let handle = d.stop_handle();
        handle.stop();
        let mut sink = RecordingSink::default();
        // Already stopped: run returns immediately and shuts the session down.
        d.run(&mut sink);
        assert!(!d.session().is_live());
    }
}
