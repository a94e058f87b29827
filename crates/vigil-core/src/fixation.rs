//! Fixation State Machine
//!
//! Tracks which region the gaze currently targets, accumulates dwell time
//! against it, and reports leveled threshold crossings. `tick` returns the
//! events produced that tick; every reaction wired to a level is guarded
//! by the session's fired bitmask so it happens at most once per
//! continuous dwell.

use crate::config::FixationConfig;
use crate::domain::RegionKind;
use crate::region::Region;

/// Dwell escalation levels, ascending severity. `Ghost` is the highest and
/// gates the score bonus and media reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixationLevel {
    Glance,
    Linger,
    Study,
    Fixate,
    Ghost,
}

impl FixationLevel {
    pub const ALL: [FixationLevel; 5] = [
        FixationLevel::Glance,
        FixationLevel::Linger,
        FixationLevel::Study,
        FixationLevel::Fixate,
        FixationLevel::Ghost,
    ];

    pub fn index(self) -> usize {
        match self {
            FixationLevel::Glance => 0,
            FixationLevel::Linger => 1,
            FixationLevel::Study => 2,
            FixationLevel::Fixate => 3,
            FixationLevel::Ghost => 4,
        }
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

/// One continuous dwell on one region. Reset whenever the hit target
/// changes, including hit→none and none→hit.
#[derive(Debug, Clone)]
pub struct FixationSession {
    pub region_id: String,
    pub kind: RegionKind,
    pub dwell_seconds: f32,
    /// Monotone bitmask of levels attained; cleared only on target change.
    fired: u8,
}

impl FixationSession {
    fn new(region: &Region) -> Self {
        Self {
            region_id: region.id.clone(),
            kind: region.kind,
            dwell_seconds: 0.0,
            fired: 0,
        }
    }

    pub fn has_fired(&self, level: FixationLevel) -> bool {
        self.fired & level.bit() != 0
    }

    fn mark_fired(&mut self, level: FixationLevel) {
        self.fired |= level.bit();
    }
}

/// Events produced by one tick of the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum FixationEvent {
    TargetAcquired {
        region_id: String,
        kind: RegionKind,
    },
    TargetLost {
        region_id: String,
        dwell_seconds: f32,
    },
    LevelReached {
        region_id: String,
        kind: RegionKind,
        level: FixationLevel,
        dwell_seconds: f32,
    },
}

#[derive(Debug, Clone, Default)]
enum FixationState {
    #[default]
    Idle,
    Locked(FixationSession),
}

#[derive(Debug, Clone)]
pub struct FixationMachine {
    cfg: FixationConfig,
    state: FixationState,
}

impl FixationMachine {
    pub fn new(cfg: FixationConfig) -> Self {
        Self {
            cfg,
            state: FixationState::Idle,
        }
    }

    /// Currently locked dwell session, if any.
    pub fn session(&self) -> Option<&FixationSession> {
        match &self.state {
            FixationState::Idle => None,
            FixationState::Locked(s) => Some(s),
        }
    }

    /// Discard any live session, as on scene change or restart.
    pub fn reset(&mut self) {
        self.state = FixationState::Idle;
    }

    /// Advance one tick given the hit-test result. dt accrues on the tick
    /// a lock is acquired, so an n-tick dwell accumulates exactly n·dt.
    pub fn tick(&mut self, hit: Option<&Region>, dt: f32) -> Vec<FixationEvent> {
        let mut events = Vec::new();

        match (&mut self.state, hit) {
            (FixationState::Idle, None) => {}
            (FixationState::Idle, Some(region)) => {
                events.push(FixationEvent::TargetAcquired {
                    region_id: region.id.clone(),
                    kind: region.kind,
                });
                self.state = FixationState::Locked(FixationSession::new(region));
            }
            (FixationState::Locked(session), None) => {
                events.push(FixationEvent::TargetLost {
                    region_id: session.region_id.clone(),
                    dwell_seconds: session.dwell_seconds,
                });
                self.state = FixationState::Idle;
            }
            (FixationState::Locked(session), Some(region)) => {
                if session.region_id != region.id {
                    // Switching targets forfeits all partial progress.
                    events.push(FixationEvent::TargetLost {
                        region_id: session.region_id.clone(),
                        dwell_seconds: session.dwell_seconds,
                    });
                    events.push(FixationEvent::TargetAcquired {
                        region_id: region.id.clone(),
                        kind: region.kind,
                    });
                    self.state = FixationState::Locked(FixationSession::new(region));
                }
            }
        }

        if let FixationState::Locked(session) = &mut self.state {
            session.dwell_seconds += dt;
            // A large dt may cross several thresholds at once; fire them in
            // ascending order, each at most once per session.
            for level in FixationLevel::ALL {
                let threshold = self.cfg.level_thresholds_sec[level.index()];
                if session.dwell_seconds >= threshold && !session.has_fired(level) {
                    session.mark_fired(level);
                    events.push(FixationEvent::LevelReached {
                        region_id: session.region_id.clone(),
                        kind: session.kind,
                        level,
                        dwell_seconds: session.dwell_seconds,
                    });
                }
            }
        }

        events
    }
}
