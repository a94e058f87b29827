//! One-shot action sink boundary.
//!
//! The core emits each of these at most once per dwell session per region;
//! the sink owns all rendering/media consequences. Sink failures are
//! swallowed and logged at the session boundary and never roll back the
//! fired flags, so a rejecting sink cannot cause retry storms.

use serde::Serialize;
use thiserror::Error;

use crate::domain::RegionKind;
use crate::fixation::FixationLevel;

#[derive(Error, Debug)]
#[error("event sink failure: {0}")]
pub struct SinkError(pub String);

/// Notifications delivered to the external presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GazeEvent {
    /// Cosmetic "entered" indicator; fires immediately on any hit.
    RegionEntered { region_id: String, kind: RegionKind },
    /// Escalating visual emphasis for each dwell level reached.
    DwellLevel {
        region_id: String,
        kind: RegionKind,
        #[serde(serialize_with = "level_name")]
        level: FixationLevel,
        dwell_seconds: f32,
    },
    /// Audit-log entry for a sustained dwell, tagged sensitive.
    AuditEntry {
        region_id: String,
        kind: RegionKind,
        dwell_seconds: f32,
        sensitive: bool,
    },
    /// Cumulative score changed by a one-time bonus.
    ScoreChanged { total: f32 },
    /// Reveal the media associated with the region (ghost level).
    RevealMedia { region_id: String },
}

fn level_name<S: serde::Serializer>(level: &FixationLevel, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(match level {
        FixationLevel::Glance => "glance",
        FixationLevel::Linger => "linger",
        FixationLevel::Study => "study",
        FixationLevel::Fixate => "fixate",
        FixationLevel::Ghost => "ghost",
    })
}

/// Receives fire-once notifications. Implementations must tolerate being
/// called at tick rate and may reject; rejection is logged by the caller
/// and never retried.
pub trait EventSink {
    fn deliver(&mut self, event: &GazeEvent) -> Result<(), SinkError>;
}

/// Sink that drops everything; used after teardown and in passive scenes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn deliver(&mut self, _event: &GazeEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Test/demo sink that records everything it is handed.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<GazeEvent>,
}

impl EventSink for RecordingSink {
    fn deliver(&mut self, event: &GazeEvent) -> Result<(), SinkError> {
        self.events.push(event.clone());
        Ok(())
    }
}
