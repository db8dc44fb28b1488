//! Spatial hash for "is there already a point near here?" queries.
//!
//! Points are bucketed into cubic (or square, in planar mode) cells of side
//! `cell_size`. A query scans just enough neighbour rings to cover the
//! search radius, so the answer does not depend on the cell size.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{ConfigError, Result};
use crate::math::{dist_xy, Point3};

use super::Located;

/// Which coordinates a [`GridIndex`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupeGridMode {
    /// XY only. Points at different heights collide.
    #[default]
    Planar,
    /// Full 3D distance.
    Spatial,
}

type CellKey = (i64, i64, i64);

/// Grid-bucketed point set with radius queries. Append-only.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f64,
    mode: DedupeGridMode,
    buckets: FxHashMap<CellKey, Vec<Point3>>,
    len: usize,
}

impl GridIndex {
    /// Creates an empty index.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when `cell_size` is NaN, infinite or not
    /// positive.
    pub fn new(cell_size: f64, mode: DedupeGridMode) -> Result<Self> {
        if !cell_size.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "cell_size",
                value: cell_size,
            }
            .into());
        }
        if cell_size <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "cell_size",
                value: cell_size,
            }
            .into());
        }
        Ok(Self {
            cell_size,
            mode,
            buckets: FxHashMap::default(),
            len: 0,
        })
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[must_use]
    pub fn mode(&self) -> DedupeGridMode {
        self.mode
    }

    /// Inserts a point.
    pub fn add(&mut self, p: Point3) {
        let key = self.cell_coords(&p);
        self.buckets.entry(key).or_default().push(p);
        self.len += 1;
    }

    /// Inserts every point of `points`.
    pub fn add_many<I: IntoIterator<Item = Point3>>(&mut self, points: I) {
        for p in points {
            self.add(p);
        }
    }

    /// Returns `true` if a stored point lies within `radius` of `p`
    /// (inclusive). A non-positive radius or a non-finite query point never
    /// matches.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn has_near(&self, p: &Point3, radius: f64) -> bool {
        if radius.is_nan() || radius <= 0.0 || self.len == 0 || !self.is_finite(p) {
            return false;
        }

        let rings = (radius / self.cell_size).ceil().max(1.0);
        let side = 2.0 * rings + 1.0;
        let cells = match self.mode {
            DedupeGridMode::Planar => side * side,
            DedupeGridMode::Spatial => side * side * side,
        };
        // More neighbour cells than buckets: scanning the buckets is cheaper.
        if !cells.is_finite() || cells >= self.buckets.len() as f64 {
            return self
                .buckets
                .values()
                .flatten()
                .any(|q| self.distance(p, q) <= radius);
        }

        let rings = rings as i64;
        let z_rings = match self.mode {
            DedupeGridMode::Planar => 0,
            DedupeGridMode::Spatial => rings,
        };
        let (cx, cy, cz) = self.cell_coords(p);
        for dx in -rings..=rings {
            for dy in -rings..=rings {
                for dz in -z_rings..=z_rings {
                    let key = (
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    );
                    let Some(points) = self.buckets.get(&key) else {
                        continue;
                    };
                    if points.iter().any(|q| self.distance(p, q) <= radius) {
                        return true;
                    }
                }
            }
        }
        false
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_finite(&self, p: &Point3) -> bool {
        p.x.is_finite()
            && p.y.is_finite()
            && (self.mode == DedupeGridMode::Planar || p.z.is_finite())
    }

    fn distance(&self, a: &Point3, b: &Point3) -> f64 {
        match self.mode {
            DedupeGridMode::Planar => dist_xy(a, b),
            DedupeGridMode::Spatial => (a - b).norm(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_coords(&self, p: &Point3) -> CellKey {
        let z = match self.mode {
            DedupeGridMode::Planar => 0,
            DedupeGridMode::Spatial => (p.z / self.cell_size).floor() as i64,
        };
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            z,
        )
    }
}

/// Exact-position dedupe: coordinates snapped to a step and hashed.
#[derive(Debug, Clone)]
pub struct SnapKeySet {
    step: f64,
    keys: FxHashSet<CellKey>,
}

impl SnapKeySet {
    /// Creates an empty set snapping to `step`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when `step` is not a positive finite number.
    pub fn new(step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "snap_step",
                value: step,
            }
            .into());
        }
        Ok(Self {
            step,
            keys: FxHashSet::default(),
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn key(&self, p: &Point3) -> CellKey {
        (
            (p.x / self.step).round() as i64,
            (p.y / self.step).round() as i64,
            (p.z / self.step).round() as i64,
        )
    }

    /// Inserts `p`; returns `false` if its snapped key was already present.
    pub fn insert(&mut self, p: &Point3) -> bool {
        let key = self.key(p);
        self.keys.insert(key)
    }

    #[must_use]
    pub fn contains(&self, p: &Point3) -> bool {
        self.keys.contains(&self.key(p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// How new points are compared against existing ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DedupeMode {
    /// Same position after snapping to `step`.
    Exact { step: f64 },
    /// Within `radius` in the plan.
    Radius { radius: f64 },
}

/// Drops the items that duplicate `existing` or an earlier kept item.
///
/// Returns the kept items in input order and the number skipped.
///
/// # Errors
///
/// Returns a `ConfigError` when the snap step or radius is not positive.
pub fn dedupe_against<T: Located>(
    items: Vec<T>,
    existing: &[Point3],
    mode: DedupeMode,
) -> Result<(Vec<T>, usize)> {
    let mut kept = Vec::with_capacity(items.len());
    let mut skipped = 0;

    match mode {
        DedupeMode::Exact { step } => {
            let mut keys = SnapKeySet::new(step)?;
            for p in existing {
                keys.insert(p);
            }
            for item in items {
                if keys.insert(&item.location()) {
                    kept.push(item);
                } else {
                    skipped += 1;
                }
            }
        }
        DedupeMode::Radius { radius } => {
            let mut index = GridIndex::new(radius, DedupeGridMode::Planar)?;
            index.add_many(existing.iter().copied());
            for item in items {
                let p = item.location();
                if index.has_near(&p, radius) {
                    skipped += 1;
                } else {
                    index.add(p);
                    kept.push(item);
                }
            }
        }
    }
    Ok((kept, skipped))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlacementError;

    #[test]
    fn radius_is_inclusive() {
        let mut idx = GridIndex::new(300.0, DedupeGridMode::Planar).unwrap();
        idx.add(Point3::new(0.0, 0.0, 0.0));
        assert!(idx.has_near(&Point3::new(250.0, 0.0, 0.0), 300.0));
        assert!(!idx.has_near(&Point3::new(350.0, 0.0, 0.0), 300.0));
        assert!(idx.has_near(&Point3::new(300.0, 0.0, 0.0), 300.0));
    }

    #[test]
    fn non_positive_radius_never_matches() {
        let mut idx = GridIndex::new(1.0, DedupeGridMode::Planar).unwrap();
        idx.add(Point3::origin());
        assert!(!idx.has_near(&Point3::origin(), 0.0));
        assert!(!idx.has_near(&Point3::origin(), -1.0));
        assert!(!idx.has_near(&Point3::origin(), f64::NAN));
    }

    #[test]
    fn radius_larger_than_cell_scans_more_rings() {
        let mut idx = GridIndex::new(100.0, DedupeGridMode::Planar).unwrap();
        idx.add(Point3::new(0.0, 0.0, 0.0));
        assert!(idx.has_near(&Point3::new(450.0, 0.0, 0.0), 500.0));
        assert!(!idx.has_near(&Point3::new(550.0, 0.0, 0.0), 500.0));
    }

    #[test]
    fn planar_ignores_height_spatial_does_not() {
        let p = Point3::new(10.0, 10.0, 0.0);
        let above = Point3::new(10.0, 10.0, 2000.0);

        let mut planar = GridIndex::new(300.0, DedupeGridMode::Planar).unwrap();
        planar.add(p);
        assert!(planar.has_near(&above, 300.0));

        let mut spatial = GridIndex::new(300.0, DedupeGridMode::Spatial).unwrap();
        spatial.add(p);
        assert!(!spatial.has_near(&above, 300.0));
        assert!(spatial.has_near(&Point3::new(10.0, 10.0, 200.0), 300.0));
    }

    #[test]
    fn far_and_infinite_coordinates_do_not_overflow() {
        let mut idx = GridIndex::new(300.0, DedupeGridMode::Planar).unwrap();
        idx.add(Point3::origin());
        assert!(!idx.has_near(&Point3::new(f64::INFINITY, 0.0, 0.0), 300.0));
        assert!(!idx.has_near(&Point3::new(0.0, f64::NEG_INFINITY, 0.0), 300.0));
        assert!(!idx.has_near(&Point3::new(f64::NAN, 0.0, 0.0), 300.0));

        // Cell coordinates past i64::MAX saturate instead of wrapping.
        let far = Point3::new(1e25, -1e25, 0.0);
        assert!(!idx.has_near(&far, 300.0));
        idx.add(far);
        assert!(idx.has_near(&far, 300.0));
        for i in 0..20 {
            idx.add(Point3::new(f64::from(i) * 1000.0, 0.0, 0.0));
        }
        assert!(idx.has_near(&Point3::new(1e25, -1e25 + 100.0, 0.0), 300.0));
        assert!(!idx.has_near(&Point3::new(1e25, 0.0, 0.0), 300.0));
    }

    #[test]
    fn infinite_radius_scans_every_bucket() {
        let mut idx = GridIndex::new(10.0, DedupeGridMode::Spatial).unwrap();
        idx.add(Point3::new(5000.0, 5000.0, 5000.0));
        assert!(idx.has_near(&Point3::origin(), f64::INFINITY));
    }

    #[test]
    fn negative_coordinates_floor_correctly() {
        let mut idx = GridIndex::new(1.0, DedupeGridMode::Planar).unwrap();
        idx.add(Point3::new(-0.1, -0.1, 0.0));
        assert!(idx.has_near(&Point3::new(0.1, 0.1, 0.0), 0.5));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn rejects_bad_cell_size() {
        assert!(matches!(
            GridIndex::new(0.0, DedupeGridMode::Planar).unwrap_err(),
            PlacementError::Config(ConfigError::NotPositive { .. })
        ));
        assert!(matches!(
            GridIndex::new(f64::NAN, DedupeGridMode::Planar).unwrap_err(),
            PlacementError::Config(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn exact_mode_snaps() {
        let existing = [Point3::new(1000.0, 0.0, 0.0)];
        let items = vec![
            Point3::new(1001.0, 0.0, 0.0),
            Point3::new(1010.0, 0.0, 0.0),
            Point3::new(1010.5, 0.0, 0.0),
        ];
        let (kept, skipped) =
            dedupe_against(items, &existing, DedupeMode::Exact { step: 5.0 }).unwrap();
        assert_eq!(skipped, 2);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].x - 1010.0).abs() < 1e-12);
    }

    #[test]
    fn radius_mode_checks_earlier_items() {
        let items = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(100.0, 0.0, 0.0),
            Point3::new(1000.0, 0.0, 0.0),
        ];
        let (kept, skipped) =
            dedupe_against(items, &[], DedupeMode::Radius { radius: 300.0 }).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(skipped, 1);
    }
}
