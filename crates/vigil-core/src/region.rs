//! Region Index
//!
//! Hit-testable screen regions (the camera wall). Bounds are queried live
//! each tick through a provider closure so regions may move or resize;
//! nothing here caches a stale rectangle. Iteration order is creation
//! order and is the tie-break everywhere (first created wins).

use std::fmt;

use tracing::debug;

use crate::domain::{distance, Rect, RegionKind, SnappedPoint};

type BoundsProvider = Box<dyn Fn() -> Rect + Send + Sync>;

/// One hit-testable region. Identity is the `id` string; two regions with
/// equal bounds are still distinct targets.
pub struct Region {
    pub id: String,
    pub kind: RegionKind,
    bounds: BoundsProvider,
}

impl Region {
    /// Region whose bounds are re-queried from `provider` every tick.
    pub fn new(
        id: impl Into<String>,
        kind: RegionKind,
        provider: impl Fn() -> Rect + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            bounds: Box::new(provider),
        }
    }

    /// Region with bounds that never change.
    pub fn fixed(id: impl Into<String>, kind: RegionKind, rect: Rect) -> Self {
        Self::new(id, kind, move || rect)
    }

    /// Live bounds for this tick.
    pub fn bounds(&self) -> Rect {
        (self.bounds)()
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("bounds", &self.bounds())
            .finish()
    }
}

/// The current set of regions for the active scene, in creation order.
#[derive(Debug, Default)]
pub struct RegionIndex {
    regions: Vec<Region>,
}

impl RegionIndex {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn all(&self) -> &[Region] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Nearest region by center distance, skipping degenerate bounds.
    /// Strict `<` keeps the first-created region on ties.
    pub fn nearest(&self, point: SnappedPoint) -> Option<(&Region, f32)> {
        let mut best: Option<(&Region, f32)> = None;
        for region in &self.regions {
            let rect = region.bounds();
            if rect.is_degenerate() {
                debug!(region = %region.id, "skipping region with degenerate bounds");
                continue;
            }
            let (cx, cy) = rect.center();
            let d = distance(point.x, point.y, cx, cy);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((region, d));
            }
        }
        best
    }

    /// Resolve the region the point is looking at: first region whose live
    /// bounds contain the point, else the nearest region when its center is
    /// within `snap_radius`. Degenerate regions are skipped for the tick.
    pub fn hit_test(&self, point: SnappedPoint, snap_radius: f32) -> Option<&Region> {
        for region in &self.regions {
            let rect = region.bounds();
            if rect.is_degenerate() {
                debug!(region = %region.id, "skipping region with degenerate bounds");
                continue;
            }
            if rect.contains(point.x, point.y) {
                return Some(region);
            }
        }
        match self.nearest(point) {
            Some((region, d)) if d <= snap_radius => Some(region),
            _ => None,
        }
    }
}
