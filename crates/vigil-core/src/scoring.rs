//! Scoring & Analytics Engine
//!
//! Accumulates the cumulative voyeur score and per-type dwell totals,
//! maintains the rolling jitter window behind the stability rating, and
//! derives the end-of-session behavioral profile. All accumulators are
//! monotone for the life of the session; only an explicit restart clears
//! them.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::domain::RegionKind;

/// Neutral star rating reported before enough jitter samples exist.
const NEUTRAL_STARS: u8 = 3;

/// Fallback profile when no type dominates or the dominant type has no
/// label of its own.
const BALANCED_PROFILE: &str = "BALANCED OBSERVER";

/// Read-only snapshot for the report scene; callable at any time.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub cumulative_score: f32,
    pub per_type_dwell: HashMap<RegionKind, f32>,
    pub stability_stars: u8,
    pub profile: String,
}

#[derive(Debug, Clone)]
pub struct ScoreEngine {
    cfg: ScoringConfig,
    jitter_window: usize,
    cumulative: f32,
    per_type_dwell: HashMap<RegionKind, f32>,
    jitter: VecDeque<f32>,
}

impl ScoreEngine {
    /// `jitter_window` is the ring size, shared with the filter's setting.
    pub fn new(cfg: ScoringConfig, jitter_window: usize) -> Self {
        Self {
            cfg,
            jitter_window,
            cumulative: 0.0,
            per_type_dwell: HashMap::new(),
            jitter: VecDeque::with_capacity(jitter_window),
        }
    }

    /// Clear everything, as on explicit session restart.
    pub fn reset(&mut self) {
        self.cumulative = 0.0;
        self.per_type_dwell.clear();
        self.jitter.clear();
    }

    /// Accrue one locked tick: weighted score plus the per-type dwell
    /// total that survives fixation-session resets.
    pub fn accrue_dwell(&mut self, kind: RegionKind, dt: f32) {
        self.cumulative += dt * self.cfg.base_rate * self.cfg.weight(kind);
        *self.per_type_dwell.entry(kind).or_insert(0.0) += dt;
    }

    /// Flat ghost-level bonus; the caller guards the once-per-session
    /// guarantee via the fixation fired flags. Returns the new total.
    pub fn grant_ghost_bonus(&mut self) -> f32 {
        self.cumulative += self.cfg.ghost_bonus;
        self.cumulative
    }

    /// Record one smoothed-point movement sample into the rolling window.
    pub fn record_jitter(&mut self, jitter: f32) {
        self.jitter.push_back(jitter);
        while self.jitter.len() > self.jitter_window {
            self.jitter.pop_front();
        }
    }

    pub fn cumulative_score(&self) -> f32 {
        self.cumulative
    }

    pub fn dwell_for(&self, kind: RegionKind) -> f32 {
        self.per_type_dwell.get(&kind).copied().unwrap_or(0.0)
    }

    /// 1–5 star stability rating: lower average jitter means more stars,
    /// neutral while the window is still filling.
    pub fn stability_stars(&self) -> u8 {
        if self.jitter.len() < self.cfg.min_jitter_samples {
            return NEUTRAL_STARS;
        }
        let avg = self.jitter.iter().sum::<f32>() / self.jitter.len() as f32;
        let norm = (avg / self.cfg.jitter_for_min_stars).clamp(0.0, 1.0);
        let stars = 5.0 - 4.0 * norm;
        (stars.round() as u8).clamp(1, 5)
    }

    /// Behavioral profile from the per-type dwell distribution: the
    /// dominant type's label when its share clears the dominance
    /// threshold, otherwise the balanced default.
    pub fn profile(&self) -> String {
        let total: f32 = self.per_type_dwell.values().sum();
        if total <= 0.0 {
            return BALANCED_PROFILE.to_string();
        }
        // Deterministic winner on ties: kind declaration order.
        let mut dominant: Option<(RegionKind, f32)> = None;
        for kind in [
            RegionKind::Bedroom,
            RegionKind::Office,
            RegionKind::Corridor,
            RegionKind::Elevator,
            RegionKind::Unknown,
        ] {
            let dwell = self.dwell_for(kind);
            if dominant.map_or(dwell > 0.0, |(_, best)| dwell > best) {
                dominant = Some((kind, dwell));
            }
        }
        match dominant {
            Some((kind, dwell)) if dwell / total >= self.cfg.dominance_threshold => {
                profile_label(kind)
                    .map(str::to_string)
                    .unwrap_or_else(|| BALANCED_PROFILE.to_string())
            }
            _ => BALANCED_PROFILE.to_string(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            cumulative_score: self.cumulative,
            per_type_dwell: self.per_type_dwell.clone(),
            stability_stars: self.stability_stars(),
            profile: self.profile(),
        }
    }
}

/// Fixed dominant-type to profile-label table.
fn profile_label(kind: RegionKind) -> Option<&'static str> {
    match kind {
        RegionKind::Bedroom => Some("BEDROOM WATCHER"),
        RegionKind::Office => Some("OFFICE WATCHER"),
        RegionKind::Corridor => Some("CORRIDOR WATCHER"),
        RegionKind::Elevator => Some("ELEVATOR WATCHER"),
        RegionKind::Unknown => None,
    }
}
