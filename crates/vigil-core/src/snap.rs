//! Region Snapper
//!
//! Pulls a smoothed point toward the nearest region center when close
//! enough, with linear falloff: full pull at the center, none at the
//! radius edge. Absorbs edge jitter without affecting behavior once the
//! gaze is confidently inside or clearly outside a region.

use crate::config::SnapConfig;
use crate::domain::{SmoothedPoint, SnappedPoint};
use crate::region::RegionIndex;

#[derive(Debug, Clone)]
pub struct RegionSnapper {
    cfg: SnapConfig,
}

impl RegionSnapper {
    pub fn new(cfg: SnapConfig) -> Self {
        Self { cfg }
    }

    /// Bias the point toward the nearest region center, or pass it through
    /// unchanged when no center is within the snap radius.
    pub fn snap(&self, point: SmoothedPoint, regions: &RegionIndex) -> SnappedPoint {
        let raw = SnappedPoint {
            x: point.x,
            y: point.y,
        };
        let Some((region, d)) = regions.nearest(raw) else {
            return raw;
        };
        if d > self.cfg.radius_px {
            return raw;
        }
        let pull = self.cfg.strength * (1.0 - d / self.cfg.radius_px);
        let (cx, cy) = region.bounds().center();
        SnappedPoint {
            x: raw.x + (cx - raw.x) * pull,
            y: raw.y + (cy - raw.y) * pull,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rect, RegionKind};
    use crate::region::Region;

    fn one_region() -> RegionIndex {
        // Center at (150, 150).
        RegionIndex::new(vec![Region::fixed(
            "cam",
            RegionKind::Office,
            Rect::new(100.0, 100.0, 100.0, 100.0),
        )])
    }

    fn snapper() -> RegionSnapper {
        RegionSnapper::new(SnapConfig {
            radius_px: 100.0,
            strength: 0.5,
        })
    }

    fn smoothed(x: f32, y: f32) -> SmoothedPoint {
        SmoothedPoint {
            x,
            y,
            ts_ms: 0,
            valid: true,
        }
    }

    #[test]
    fn outside_radius_passes_through() {
        let out = snapper().snap(smoothed(150.0, 300.0), &one_region());
        assert_eq!(out.x, 150.0);
        assert_eq!(out.y, 300.0);
    }

    #[test]
    fn inside_radius_pulls_toward_center() {
        // 50px from center: pull = 0.5 * (1 - 50/100) = 0.25.
        let out = snapper().snap(smoothed(200.0, 150.0), &one_region());
        assert!((out.x - 187.5).abs() < 1e-3);
        assert_eq!(out.y, 150.0);
    }

    #[test]
    fn pull_strength_increases_monotonically_toward_center() {
        let s = snapper();
        let idx = one_region();
        let mut last_pull = -1.0f32;
        // Walk in from the radius edge toward the center.
        for d in [99.0f32, 80.0, 60.0, 40.0, 20.0, 5.0] {
            let before = smoothed(150.0 + d, 150.0);
            let after = s.snap(before, &idx);
            let pull = (before.x - after.x) / d; // fraction of distance recovered
            assert!(
                pull >= last_pull,
                "pull fraction must not decrease nearer the center"
            );
            last_pull = pull;
        }
    }

    #[test]
    fn empty_index_passes_through() {
        let out = snapper().snap(smoothed(10.0, 20.0), &RegionIndex::default());
        assert_eq!(out.x, 10.0);
        assert_eq!(out.y, 20.0);
    }
}
