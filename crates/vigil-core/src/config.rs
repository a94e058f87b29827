use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::domain::RegionKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level tuning for the whole pipeline. Every constant here is policy,
/// not structure; defaults match the installation's shipped behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub fixation: FixationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl VigilConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let cfg: VigilConfig = toml::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.filter.alpha > 0.0 && self.filter.alpha <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "filter.alpha must be in (0, 1], got {}",
                self.filter.alpha
            )));
        }
        if self.filter.max_jump_px <= 0.0 {
            return Err(ConfigError::Validation(
                "filter.max_jump_px must be positive".into(),
            ));
        }
        if self.filter.jitter_window == 0 {
            return Err(ConfigError::Validation(
                "filter.jitter_window must be at least 1".into(),
            ));
        }
        if self.snap.radius_px <= 0.0 {
            return Err(ConfigError::Validation(
                "snap.radius_px must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.snap.strength) {
            return Err(ConfigError::Validation(format!(
                "snap.strength must be in [0, 1], got {}",
                self.snap.strength
            )));
        }
        let t = &self.fixation.level_thresholds_sec;
        if t.iter().any(|v| *v <= 0.0) || t.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Validation(
                "fixation.level_thresholds_sec must be positive and strictly ascending".into(),
            ));
        }
        if self.scoring.base_rate < 0.0 {
            return Err(ConfigError::Validation(
                "scoring.base_rate must not be negative".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.scoring.dominance_threshold) {
            return Err(ConfigError::Validation(
                "scoring.dominance_threshold must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }
}

/// Sample filter tuning (EMA smoothing + blink rejection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// EMA smoothing factor; higher tracks faster, lower smooths harder.
    pub alpha: f32,
    /// Jump distance (px) beyond which a sample is an outlier candidate.
    pub max_jump_px: f32,
    /// How long (ms) an outlier run is held at the stable point before a
    /// sustained jump is accepted as a genuine relocation.
    pub hold_window_ms: i64,
    /// Rolling jitter window length used for stability scoring.
    pub jitter_window: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha: 0.35,
            max_jump_px: 140.0,
            hold_window_ms: 180, // roughly one blink
            jitter_window: 30,
        }
    }
}

/// Region snapping tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Distance (px) from a region center within which snapping applies.
    pub radius_px: f32,
    /// Pull fraction at the region center; falls off linearly to zero at
    /// the radius edge.
    pub strength: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            radius_px: 100.0,
            strength: 0.55,
        }
    }
}

/// Dwell thresholds for the five fixation levels, ascending seconds:
/// Glance, Linger, Study, Fixate, Ghost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixationConfig {
    pub level_thresholds_sec: [f32; 5],
}

impl Default for FixationConfig {
    fn default() -> Self {
        Self {
            level_thresholds_sec: [0.4, 0.9, 1.4, 1.8, 2.2],
        }
    }
}

/// Scoring, stability and profile tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score units accrued per second of dwell at weight 1.0.
    pub base_rate: f32,
    /// Per-kind score multipliers; kinds not listed here score at 1.0.
    pub type_weights: HashMap<RegionKind, f32>,
    /// Flat one-time bonus granted when the ghost level fires.
    pub ghost_bonus: f32,
    /// Below this many jitter samples the stability rating is neutral.
    pub min_jitter_samples: usize,
    /// Average jitter (px) at or above which stability bottoms out at 1 star.
    pub jitter_for_min_stars: f32,
    /// Dominant-type share below which the profile is the balanced default.
    pub dominance_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut type_weights = HashMap::new();
        type_weights.insert(RegionKind::Bedroom, 2.0);
        type_weights.insert(RegionKind::Elevator, 1.4);
        type_weights.insert(RegionKind::Office, 1.2);
        Self {
            base_rate: 1.0,
            type_weights,
            ghost_bonus: 6.0,
            min_jitter_samples: 8,
            jitter_for_min_stars: 24.0,
            dominance_threshold: 0.34,
        }
    }
}

impl ScoringConfig {
    /// Weight lookup with explicit 1.0 default for unlisted kinds.
    pub fn weight(&self, kind: RegionKind) -> f32 {
        self.type_weights.get(&kind).copied().unwrap_or(1.0)
    }
}
