//! Session orchestration
//!
//! `ObservationSession` owns every pipeline component and advances them in
//! order each tick: raw sample → filter → snapper → hit test → fixation →
//! scoring. It also owns the scene state (snapping and fixation are only
//! active in the observation scene), the degraded no-gaze mode, and the
//! liveness flag consulted by late ticks after teardown.

use tracing::{debug, info, warn};

use crate::config::VigilConfig;
use crate::domain::{dt_sec, RawSample, SmoothedPoint, SnappedPoint};
use crate::events::{EventSink, GazeEvent};
use crate::filter::SampleFilter;
use crate::fixation::{FixationEvent, FixationLevel, FixationMachine};
use crate::region::{Region, RegionIndex};
use crate::scoring::{ScoreEngine, SessionSummary};
use crate::snap::RegionSnapper;

/// Scene the installation is currently showing. Only `Observation` carries
/// hit-testable regions; everywhere else the filtered point is tracked but
/// never hit-tested.
#[derive(Debug)]
pub enum Scene {
    Passive,
    Observation { regions: Vec<Region> },
}

/// What one tick produced, for the rendering layer (gaze dot, emphasis).
#[derive(Debug, Clone)]
pub struct TickReport {
    pub smoothed: SmoothedPoint,
    /// Present only in the observation scene with a valid point.
    pub snapped: Option<SnappedPoint>,
    /// Region currently locked, with its dwell so far.
    pub locked: Option<(String, f32)>,
}

pub struct ObservationSession {
    cfg: VigilConfig,
    filter: SampleFilter,
    snapper: RegionSnapper,
    regions: RegionIndex,
    fixation: FixationMachine,
    scoring: ScoreEngine,
    observing: bool,
    gaze_enabled: bool,
    live: bool,
    last_tick_ms: Option<i64>,
}

impl ObservationSession {
    pub fn new(cfg: VigilConfig) -> Self {
        let filter = SampleFilter::new(cfg.filter.clone());
        let snapper = RegionSnapper::new(cfg.snap.clone());
        let fixation = FixationMachine::new(cfg.fixation.clone());
        let scoring = ScoreEngine::new(cfg.scoring.clone(), cfg.filter.jitter_window);
        Self {
            cfg,
            filter,
            snapper,
            regions: RegionIndex::default(),
            fixation,
            scoring,
            observing: false,
            gaze_enabled: true,
            live: false,
            last_tick_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.live = true;
        info!("observation session started");
    }

    /// Clears all session state: score, dwell totals, fixation, filter.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.fixation.reset();
        self.scoring.reset();
        self.last_tick_ms = None;
        info!("observation session reset");
    }

    /// Swap the active scene. Entering or leaving observation discards any
    /// live fixation session; score state is untouched.
    pub fn set_scene(&mut self, scene: Scene) {
        self.fixation.reset();
        match scene {
            Scene::Passive => {
                self.observing = false;
                self.regions = RegionIndex::default();
                debug!("scene set to passive");
            }
            Scene::Observation { regions } => {
                self.observing = true;
                debug!(regions = regions.len(), "scene set to observation");
                self.regions = RegionIndex::new(regions);
            }
        }
    }

    /// Degraded mode for a gaze source that failed to initialize: the
    /// session keeps ticking, Idle forever, instead of failing.
    pub fn set_gaze_enabled(&mut self, enabled: bool) {
        if !enabled {
            warn!("gaze source unavailable; continuing without fixation input");
        }
        self.gaze_enabled = enabled;
    }

    /// Stop reacting. Ticks arriving after shutdown keep no state and
    /// deliver no events.
    pub fn shutdown(&mut self) {
        self.live = false;
        info!("observation session shut down");
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Pure read of current analytics; callable at any time.
    pub fn summary(&self) -> SessionSummary {
        self.scoring.summary()
    }

    /// Advance the pipeline by one tick. `raw` is the mailbox's latest
    /// sample (last-value-wins); `now_ms` comes from the tick driver.
    pub fn tick(
        &mut self,
        raw: Option<RawSample>,
        now_ms: i64,
        sink: &mut dyn EventSink,
    ) -> TickReport {
        if !self.live {
            return TickReport {
                smoothed: self.filter.current(),
                snapped: None,
                locked: None,
            };
        }

        let dt = match self.last_tick_ms {
            Some(last) if now_ms < last => {
                warn!(now_ms, last, "tick timestamp went backwards; using dt=0");
                0.0
            }
            Some(last) => dt_sec(now_ms, last),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);

        // 1. Filter the latest raw sample; without one, the previous
        //    smoothed point is reused unchanged.
        let (smoothed, jitter) = match raw {
            Some(sample) if self.gaze_enabled => {
                let out = self.filter.ingest(&sample);
                (out.point, out.jitter)
            }
            _ => (self.filter.current(), None),
        };
        if let Some(j) = jitter {
            self.scoring.record_jitter(j);
        }

        // 2. Outside the observation scene (or before the first valid
        //    sample) the point is tracked but never hit-tested.
        if !self.observing || !smoothed.valid {
            for event in self.fixation.tick(None, dt) {
                self.dispatch_fixation(event, dt, sink);
            }
            return TickReport {
                smoothed,
                snapped: None,
                locked: None,
            };
        }

        // 3. Snap toward the nearest region center, then resolve the hit.
        let snapped = self.snapper.snap(smoothed, &self.regions);
        let hit = self.regions.hit_test(snapped, self.cfg.snap.radius_px);

        // 4. Advance the fixation machine and accrue scoring for the
        //    region locked after this tick.
        let events = self.fixation.tick(hit, dt);
        if let Some(session) = self.fixation.session() {
            self.scoring.accrue_dwell(session.kind, dt);
        }
        for event in events {
            self.dispatch_fixation(event, dt, sink);
        }

        let locked = self
            .fixation
            .session()
            .map(|s| (s.region_id.clone(), s.dwell_seconds));
        TickReport {
            smoothed,
            snapped: Some(snapped),
            locked,
        }
    }

    /// Translate a fixation event into its configured one-shot side
    /// effects. The at-most-once guarantee comes from the fixation fired
    /// flags, not from anything here.
    fn dispatch_fixation(&mut self, event: FixationEvent, _dt: f32, sink: &mut dyn EventSink) {
        match event {
            FixationEvent::TargetAcquired { region_id, kind } => {
                self.emit(sink, GazeEvent::RegionEntered { region_id, kind });
            }
            FixationEvent::TargetLost {
                region_id,
                dwell_seconds,
            } => {
                debug!(region = %region_id, dwell = dwell_seconds, "fixation session discarded");
            }
            FixationEvent::LevelReached {
                region_id,
                kind,
                level,
                dwell_seconds,
            } => {
                self.emit(
                    sink,
                    GazeEvent::DwellLevel {
                        region_id: region_id.clone(),
                        kind,
                        level,
                        dwell_seconds,
                    },
                );
                if level == FixationLevel::Study {
                    warn!(
                        region = %region_id,
                        kind = kind.as_str(),
                        dwell = dwell_seconds,
                        sensitive = true,
                        "sustained dwell recorded"
                    );
                    self.emit(
                        sink,
                        GazeEvent::AuditEntry {
                            region_id: region_id.clone(),
                            kind,
                            dwell_seconds,
                            sensitive: true,
                        },
                    );
                }
                if level == FixationLevel::Ghost {
                    let total = self.scoring.grant_ghost_bonus();
                    self.emit(sink, GazeEvent::ScoreChanged { total });
                    self.emit(sink, GazeEvent::RevealMedia { region_id });
                }
            }
        }
    }

    /// Sink failures are swallowed here: logged, fired flags untouched, so
    /// a rejecting sink can never stop the loop or cause a retry storm.
    fn emit(&self, sink: &mut dyn EventSink, event: GazeEvent) {
        if !self.live {
            return;
        }
        if let Err(err) = sink.deliver(&event) {
            warn!(%err, ?event, "event sink rejected notification");
        }
    }
}
