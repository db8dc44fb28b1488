use crate::math::distance_2d::line_param;
use crate::math::{dist_xy, Point3, Vector2};

use super::{CurveProjection, PlanCurve};

/// A bounded straight segment from `p0` to `p1`.
///
/// Parametrized by planar arc length: `P(d) = p0 + (p1 - p0) * d / L`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    p0: Point3,
    p1: Point3,
}

impl LineSegment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(p0: Point3, p1: Point3) -> Self {
        Self { p0, p1 }
    }

    /// Unit direction in the XY plane, or `None` for a zero-length segment.
    #[must_use]
    pub fn direction(&self) -> Option<Vector2> {
        let v = Vector2::new(self.p1.x - self.p0.x, self.p1.y - self.p0.y);
        let len = v.norm();
        (len > 1e-12).then(|| v / len)
    }
}

impl PlanCurve for LineSegment {
    fn length(&self) -> f64 {
        dist_xy(&self.p0, &self.p1)
    }

    fn point_at(&self, d: f64) -> Point3 {
        let len = self.length();
        if len < 1e-12 {
            return self.p0;
        }
        let t = (d / len).clamp(0.0, 1.0);
        self.p0 + (self.p1 - self.p0) * t
    }

    fn tangent_at(&self, _d: f64) -> Vector2 {
        self.direction().unwrap_or_else(Vector2::zeros)
    }

    fn project(&self, p: &Point3) -> CurveProjection {
        let len = self.length();
        let t = line_param(p.x, p.y, self.p0.x, self.p0.y, self.p1.x, self.p1.y);
        let closest = self.point_at(t * len);
        CurveProjection {
            distance_along: t * len,
            offset: dist_xy(p, &closest),
        }
    }

    fn start(&self) -> Point3 {
        self.p0
    }

    fn end(&self) -> Point3 {
        self.p1
    }
}
