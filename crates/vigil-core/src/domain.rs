//! Core value types for the gaze pipeline.
//!
//! Timestamps are milliseconds (`i64`); time deltas are seconds (`f32`).
//! All types here are plain data; retained state lives in the component
//! that owns it (filter, fixation machine, score engine).

use serde::{Deserialize, Serialize};

/// One raw gaze (or pointer) sample as delivered by the external source.
///
/// Samples arrive at the source's own cadence; only the latest one is read
/// per tick. `valid = false` marks an explicit "no data" signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub x: f32,
    pub y: f32,
    pub ts_ms: i64,
    pub valid: bool,
}

impl RawSample {
    pub fn new(x: f32, y: f32, ts_ms: i64) -> Self {
        Self {
            x,
            y,
            ts_ms,
            valid: true,
        }
    }

    /// An explicit "no data" sample for the given tick time.
    pub fn invalid(ts_ms: i64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            ts_ms,
            valid: false,
        }
    }

    /// NaN/infinite coordinates are treated the same as an invalid sample.
    pub fn is_usable(&self) -> bool {
        self.valid && self.x.is_finite() && self.y.is_finite()
    }
}

/// Output of the sample filter; `valid` stays false until the first raw
/// sample has been absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub x: f32,
    pub y: f32,
    pub ts_ms: i64,
    pub valid: bool,
}

impl Default for SmoothedPoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            ts_ms: 0,
            valid: false,
        }
    }
}

/// Last accepted non-outlier smoothed position, used to bridge over
/// rejected outlier runs (blinks).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StablePoint {
    pub x: f32,
    pub y: f32,
    pub ts_ms: i64,
}

/// Position after region snapping; derived fresh each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnappedPoint {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Zero-area or NaN bounds; such regions are skipped for the tick.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite())
            || self.w <= 0.0
            || self.h <= 0.0
    }
}

/// Closed set of camera-feed region types on the wall.
///
/// `Unknown` is the explicit default for types outside the wall's fixed
/// vocabulary; weight and profile lookups fall back on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    Bedroom,
    Office,
    Corridor,
    Elevator,
    Unknown,
}

impl RegionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionKind::Bedroom => "BEDROOM",
            RegionKind::Office => "OFFICE",
            RegionKind::Corridor => "CORRIDOR",
            RegionKind::Elevator => "ELEVATOR",
            RegionKind::Unknown => "UNKNOWN",
        }
    }
}

/// Euclidean distance between two points.
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Delta between two millisecond timestamps, in seconds, clamped at zero.
pub fn dt_sec(now_ms: i64, last_ms: i64) -> f32 {
    (now_ms.saturating_sub(last_ms)).max(0) as f32 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(110.0, 60.0));
        assert!(!r.contains(9.9, 10.0));
        assert!(!r.contains(110.1, 60.0));
    }

    #[test]
    fn degenerate_rects() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(Rect::new(f32::NAN, 0.0, 10.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn nan_sample_unusable() {
        let mut s = RawSample::new(f32::NAN, 5.0, 100);
        assert!(!s.is_usable());
        s.x = 5.0;
        assert!(s.is_usable());
    }

    #[test]
    fn dt_never_negative() {
        assert_eq!(dt_sec(1_000, 2_000), 0.0);
        assert!((dt_sec(1_050, 1_000) - 0.05).abs() < 1e-6);
    }
}
