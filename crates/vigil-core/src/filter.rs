//! Sample Filter
//!
//! Turns raw, noisy, irregular gaze samples into a smoothed position:
//! - Exponential moving average for cheap low-latency smoothing
//! - Hold-then-accept outlier rule that hides blink spikes without
//!   losing lock, while still absorbing sustained relocations
//! - Per-tick jitter measurement feeding the stability rating

use tracing::trace;

use crate::config::FilterConfig;
use crate::domain::{distance, RawSample, SmoothedPoint, StablePoint};

/// Result of absorbing one raw sample.
#[derive(Debug, Clone, Copy)]
pub struct FilterOutput {
    /// Current smoothed position (unchanged if the sample was unusable).
    pub point: SmoothedPoint,
    /// Distance the smoothed point moved this tick; `None` when the sample
    /// was rejected, held, or was the first to initialize the filter.
    pub jitter: Option<f32>,
}

/// Owns the smoothed and stable points; call [`SampleFilter::ingest`] at
/// most once per tick.
#[derive(Debug, Clone)]
pub struct SampleFilter {
    cfg: FilterConfig,
    smoothed: SmoothedPoint,
    stable: Option<StablePoint>,
}

impl SampleFilter {
    pub fn new(cfg: FilterConfig) -> Self {
        Self {
            cfg,
            smoothed: SmoothedPoint::default(),
            stable: None,
        }
    }

    /// Latest smoothed point; `valid` is false until the first usable
    /// sample has been absorbed.
    pub fn current(&self) -> SmoothedPoint {
        self.smoothed
    }

    /// Drop all retained state, as on session restart.
    pub fn reset(&mut self) {
        self.smoothed = SmoothedPoint::default();
        self.stable = None;
    }

    /// Absorb one raw sample and return the updated smoothed position.
    pub fn ingest(&mut self, raw: &RawSample) -> FilterOutput {
        // 1. Unusable samples (explicit no-data or NaN) leave state alone.
        if !raw.is_usable() {
            return FilterOutput {
                point: self.smoothed,
                jitter: None,
            };
        }

        // 2. First valid sample initializes both points.
        if !self.smoothed.valid {
            self.smoothed = SmoothedPoint {
                x: raw.x,
                y: raw.y,
                ts_ms: raw.ts_ms,
                valid: true,
            };
            self.stable = Some(StablePoint {
                x: raw.x,
                y: raw.y,
                ts_ms: raw.ts_ms,
            });
            return FilterOutput {
                point: self.smoothed,
                jitter: None,
            };
        }

        // 3. Outlier candidate: hold at the stable point while the run is
        //    shorter than the hold window, then accept as a relocation.
        let jump = distance(raw.x, raw.y, self.smoothed.x, self.smoothed.y);
        if jump > self.cfg.max_jump_px {
            if let Some(stable) = self.stable {
                if raw.ts_ms.saturating_sub(stable.ts_ms) < self.cfg.hold_window_ms {
                    trace!(jump, "holding outlier sample at stable point");
                    self.smoothed.x = stable.x;
                    self.smoothed.y = stable.y;
                    self.smoothed.ts_ms = raw.ts_ms;
                    return FilterOutput {
                        point: self.smoothed,
                        jitter: None,
                    };
                }
            }
        }

        // 4. EMA smoothing, componentwise.
        let old = self.smoothed;
        self.smoothed.x += self.cfg.alpha * (raw.x - self.smoothed.x);
        self.smoothed.y += self.cfg.alpha * (raw.y - self.smoothed.y);
        self.smoothed.ts_ms = raw.ts_ms;

        // 5. Jitter is how far the smoothed point moved this tick.
        let jitter = distance(self.smoothed.x, self.smoothed.y, old.x, old.y);

        // 6. The accepted sample becomes the new stable point.
        self.stable = Some(StablePoint {
            x: self.smoothed.x,
            y: self.smoothed.y,
            ts_ms: raw.ts_ms,
        });

        FilterOutput {
            point: self.smoothed,
            jitter: Some(jitter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> SampleFilter {
        SampleFilter::new(FilterConfig::default())
    }

    #[test]
    fn first_sample_initializes() {
        let mut f = filter();
        let out = f.ingest(&RawSample::new(100.0, 200.0, 0));
        assert!(out.point.valid);
        assert_eq!(out.point.x, 100.0);
        assert_eq!(out.point.y, 200.0);
        assert!(out.jitter.is_none());
    }

    #[test]
    fn invalid_sample_is_noop() {
        let mut f = filter();
        f.ingest(&RawSample::new(100.0, 100.0, 0));
        let before = f.current();
        let out = f.ingest(&RawSample::invalid(50));
        assert_eq!(out.point, before);
        let out = f.ingest(&RawSample::new(f32::NAN, 5.0, 100));
        assert_eq!(out.point, before);
    }

    #[test]
    fn ema_converges_toward_target() {
        let mut f = filter();
        f.ingest(&RawSample::new(0.0, 0.0, 0));
        let mut last = 0.0;
        for i in 1..=20 {
            let out = f.ingest(&RawSample::new(100.0, 0.0, i * 50));
            assert!(out.point.x > last);
            last = out.point.x;
        }
        assert!(last > 95.0);
    }

    #[test]
    fn blink_spike_is_held_within_window() {
        let mut f = filter();
        f.ingest(&RawSample::new(500.0, 500.0, 0));
        // Spike far away 50ms later: inside the hold window, position frozen.
        let out = f.ingest(&RawSample::new(1500.0, 1500.0, 50));
        assert_eq!(out.point.x, 500.0);
        assert_eq!(out.point.y, 500.0);
        assert_eq!(out.point.ts_ms, 50);
        assert!(out.jitter.is_none());
        // Back near the origin: normal smoothing resumes.
        let out = f.ingest(&RawSample::new(505.0, 500.0, 100));
        assert!(out.jitter.is_some());
        assert!((out.point.x - 501.75).abs() < 1e-3);
    }

    #[test]
    fn sustained_jump_is_accepted_after_hold_window() {
        let mut f = filter();
        f.ingest(&RawSample::new(0.0, 0.0, 0));
        // Outlier run longer than hold_window_ms (180): held, held, accepted.
        let out = f.ingest(&RawSample::new(1000.0, 0.0, 60));
        assert_eq!(out.point.x, 0.0);
        let out = f.ingest(&RawSample::new(1000.0, 0.0, 120));
        assert_eq!(out.point.x, 0.0);
        let out = f.ingest(&RawSample::new(1000.0, 0.0, 200));
        assert!(out.point.x > 0.0, "sustained jump must be absorbed");
    }

    #[test]
    fn reset_clears_validity() {
        let mut f = filter();
        f.ingest(&RawSample::new(10.0, 10.0, 0));
        assert!(f.current().valid);
        f.reset();
        assert!(!f.current().valid);
    }
}
