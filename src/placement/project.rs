use crate::geometry::{Blocker, Opening, OpeningKind, PlanCurve, WallCurve};
use crate::math::distance_2d::{line_param, rect_corners, rect_to_segment_dist};
use crate::math::interval::Interval;
use crate::math::to_plan;

/// Geometry-unit thresholds for turning openings and blockers into blocked
/// spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningRules {
    /// Largest perpendicular distance at which an opening still belongs to
    /// a boundary segment.
    pub wall_tolerance: f64,
    /// How far past a segment end an opening may sit and still be clamped
    /// onto that end.
    pub end_extension: f64,
    pub door_clearance: f64,
    pub window_clearance: f64,
    pub default_door_width: f64,
    pub default_window_width: f64,
    pub blocker_margin: f64,
    pub blocker_max_distance: f64,
}

/// Projects openings and furniture blockers onto a boundary curve.
#[derive(Debug, Clone, Copy)]
pub struct OpeningProjector<'a> {
    rules: &'a OpeningRules,
}

impl<'a> OpeningProjector<'a> {
    #[must_use]
    pub fn new(rules: &'a OpeningRules) -> Self {
        Self { rules }
    }

    /// Width used for `opening`, falling back to the per-kind default.
    #[must_use]
    pub fn width_of(&self, opening: &Opening) -> f64 {
        opening.usable_width().unwrap_or(match opening.kind {
            OpeningKind::Door => self.rules.default_door_width,
            OpeningKind::Window => self.rules.default_window_width,
        })
    }

    /// Position of `opening` along `curve`, or `None` when it sits too far
    /// from the curve or past an end by more than the end extension.
    #[must_use]
    pub fn locate(&self, opening: &Opening, curve: &WallCurve) -> Option<f64> {
        let len = curve.length();
        let proj = curve.project(&opening.position);
        let d = proj.distance_along;
        if !d.is_finite() {
            return None;
        }

        let overshoot = if d < 0.0 {
            -d
        } else if d > len {
            d - len
        } else {
            0.0
        };
        if overshoot > self.rules.end_extension {
            return None;
        }

        // Offset is measured to the bounded curve; strip the part past the end.
        let perpendicular = (proj.offset * proj.offset - overshoot * overshoot).max(0.0).sqrt();
        if perpendicular > self.rules.wall_tolerance {
            return None;
        }
        Some(d.clamp(0.0, len))
    }

    /// Blocked span of `opening` on `curve`, widened by its clearance.
    #[must_use]
    pub fn project(&self, opening: &Opening, curve: &WallCurve) -> Option<Interval> {
        let center = self.locate(opening, curve)?;
        let clearance = match opening.kind {
            OpeningKind::Door => self.rules.door_clearance,
            OpeningKind::Window => self.rules.window_clearance,
        };
        let half = self.width_of(opening) * 0.5 + clearance;
        Some(Interval::new(center - half, center + half))
    }

    /// Blocked span of a furniture footprint on a straight `curve`.
    ///
    /// Only footprints within `blocker_max_distance` of the segment block
    /// anything; the span covers the projected corners plus the margin.
    #[must_use]
    pub fn project_blocker(&self, blocker: &Blocker, curve: &WallCurve) -> Option<Interval> {
        let line = curve.as_line()?;
        let (a, b) = (to_plan(&line.start()), to_plan(&line.end()));
        let dist = rect_to_segment_dist(&blocker.min, &blocker.max, &a, &b);
        if dist > self.rules.blocker_max_distance {
            return None;
        }

        let len = line.length();
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for c in rect_corners(&blocker.min, &blocker.max) {
            let d = (line_param(c.x, c.y, a.x, a.y, b.x, b.y) * len).clamp(0.0, len);
            lo = lo.min(d);
            hi = hi.max(d);
        }
        if hi - lo <= 0.0 {
            return None;
        }
        let margin = self.rules.blocker_margin;
        Some(Interval::new(lo - margin, hi + margin))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point2, Point3};

    const TOL: f64 = 1e-9;

    fn rules() -> OpeningRules {
        OpeningRules {
            wall_tolerance: 610.0,
            end_extension: 0.0,
            door_clearance: 300.0,
            window_clearance: 0.0,
            default_door_width: 900.0,
            default_window_width: 1200.0,
            blocker_margin: 50.0,
            blocker_max_distance: 500.0,
        }
    }

    fn wall() -> WallCurve {
        WallCurve::line(Point3::new(0.0, 0.0, 0.0), Point3::new(4000.0, 0.0, 0.0))
    }

    #[test]
    fn door_span_includes_clearance() {
        let r = rules();
        let door = Opening::door(Point3::new(2000.0, 100.0, 0.0), 900.0);
        let span = OpeningProjector::new(&r).project(&door, &wall()).unwrap();
        assert!((span.lo - 1250.0).abs() < TOL);
        assert!((span.hi - 2750.0).abs() < TOL);
    }

    #[test]
    fn missing_width_uses_default() {
        let r = rules();
        let mut window = Opening::window(Point3::new(1000.0, 0.0, 0.0), 0.0);
        window.width = None;
        let span = OpeningProjector::new(&r).project(&window, &wall()).unwrap();
        assert!((span.len() - 1200.0).abs() < TOL);
    }

    #[test]
    fn far_opening_is_ignored() {
        let r = rules();
        let door = Opening::door(Point3::new(2000.0, 700.0, 0.0), 900.0);
        assert!(OpeningProjector::new(&r).project(&door, &wall()).is_none());
    }

    #[test]
    fn past_end_needs_extension() {
        let mut r = rules();
        let door = Opening::door(Point3::new(4100.0, 0.0, 0.0), 800.0);
        assert!(OpeningProjector::new(&r).locate(&door, &wall()).is_none());

        r.end_extension = 150.0;
        let d = OpeningProjector::new(&r).locate(&door, &wall()).unwrap();
        assert!((d - 4000.0).abs() < TOL);
    }

    #[test]
    fn near_blocker_blocks_projection() {
        let r = rules();
        let cabinet = Blocker::new(Point2::new(1000.0, 100.0), Point2::new(1600.0, 700.0));
        let span = OpeningProjector::new(&r).project_blocker(&cabinet, &wall()).unwrap();
        assert!((span.lo - 950.0).abs() < TOL);
        assert!((span.hi - 1650.0).abs() < TOL);
    }

    #[test]
    fn far_blocker_is_ignored() {
        let r = rules();
        let table = Blocker::new(Point2::new(1000.0, 800.0), Point2::new(1600.0, 1400.0));
        assert!(OpeningProjector::new(&r).project_blocker(&table, &wall()).is_none());
    }
}
