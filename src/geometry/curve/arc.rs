use crate::math::arc_2d::{
    arc_from_bulge, arc_param_of_angle, arc_point_at, arc_tangent_at, ArcParams,
};
use crate::math::{dist_xy, Point3, Vector2};

use super::{CurveProjection, PlanCurve};

/// A circular wall segment defined by its endpoints and a bulge.
///
/// `bulge = tan(sweep / 4)`; positive bulges sweep counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    p0: Point3,
    p1: Point3,
    bulge: f64,
    params: ArcParams,
}

impl ArcSegment {
    /// Creates a new arc segment.
    #[must_use]
    pub fn new(p0: Point3, p1: Point3, bulge: f64) -> Self {
        let params = arc_from_bulge(p0.x, p0.y, p1.x, p1.y, bulge);
        Self {
            p0,
            p1,
            bulge,
            params,
        }
    }

    /// Returns the bulge value.
    #[must_use]
    pub fn bulge(&self) -> f64 {
        self.bulge
    }

    /// Returns the center-radius-angle form.
    #[must_use]
    pub fn params(&self) -> &ArcParams {
        &self.params
    }

    fn normalized(&self, d: f64) -> f64 {
        let len = self.length();
        if len < 1e-12 {
            0.0
        } else {
            (d / len).clamp(0.0, 1.0)
        }
    }
}

impl PlanCurve for ArcSegment {
    fn length(&self) -> f64 {
        self.params.length()
    }

    fn point_at(&self, d: f64) -> Point3 {
        if self.params.radius < 1e-12 {
            return self.p0;
        }
        let t = self.normalized(d);
        let (x, y) = arc_point_at(&self.params, t);
        Point3::new(x, y, self.p0.z + (self.p1.z - self.p0.z) * t)
    }

    fn tangent_at(&self, d: f64) -> Vector2 {
        if self.params.radius < 1e-12 {
            return Vector2::zeros();
        }
        let (tx, ty) = arc_tangent_at(&self.params, self.normalized(d));
        Vector2::new(tx, ty)
    }

    fn project(&self, p: &Point3) -> CurveProjection {
        let len = self.length();
        if self.params.radius < 1e-12 {
            return CurveProjection {
                distance_along: 0.0,
                offset: dist_xy(p, &self.p0),
            };
        }
        let angle = (p.y - self.params.cy).atan2(p.x - self.params.cx);
        let t = arc_param_of_angle(&self.params, angle);
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
