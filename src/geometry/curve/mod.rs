mod arc;
mod line;

pub use arc::ArcSegment;
pub use line::LineSegment;

use crate::error::GeometryError;
use crate::math::{Point3, Vector2};

/// Where a point lands when projected onto a plan curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveProjection {
    /// Arc-length position of the projection. May be negative or exceed the
    /// curve length when the point lies past one of the ends.
    pub distance_along: f64,
    /// Planar distance from the point to the closest point of the bounded curve.
    pub offset: f64,
}

/// Trait for bounded plan-view curves parametrized by arc length.
///
/// All positions are arc-length distances `d` in `[0, length()]` measured
/// from the start point. Planar math ignores Z; emitted points interpolate
/// the Z of the endpoints.
pub trait PlanCurve {
    /// Total arc length in the XY plane.
    fn length(&self) -> f64;

    /// Evaluates the point at arc-length `d`, clamped to the curve.
    fn point_at(&self, d: f64) -> Point3;

    /// Unit tangent at arc-length `d`, pointing toward increasing `d`.
    ///
    /// Returns the zero vector for degenerate curves.
    fn tangent_at(&self, d: f64) -> Vector2;

    /// Projects a point onto the curve in the XY plane.
    fn project(&self, p: &Point3) -> CurveProjection;

    /// Start point.
    fn start(&self) -> Point3;

    /// End point.
    fn end(&self) -> Point3;
}

/// Plan curve of a room boundary segment: straight or circular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallCurve {
    Line(LineSegment),
    Arc(ArcSegment),
}

impl WallCurve {
    /// Creates a straight boundary curve.
    #[must_use]
    pub fn line(p0: Point3, p1: Point3) -> Self {
        Self::Line(LineSegment::new(p0, p1))
    }

    /// Creates a circular boundary curve from endpoints and a bulge.
    ///
    /// A (near) zero bulge yields a straight line.
    #[must_use]
    pub fn arc(p0: Point3, p1: Point3, bulge: f64) -> Self {
        if bulge.abs() < 1e-12 {
            Self::line(p0, p1)
        } else {
            Self::Arc(ArcSegment::new(p0, p1, bulge))
        }
    }

    /// Checks that the curve has finite coordinates and a length above `eps`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN or infinite endpoints and
    /// `GeometryError::Degenerate` for curves no longer than `eps`.
    pub fn validate(&self, eps: f64) -> Result<(), GeometryError> {
        let (a, b) = (self.start(), self.end());
        if !a.iter().chain(b.iter()).all(|c| c.is_finite()) {
            return Err(GeometryError::NonFinite("boundary curve"));
        }
        if let Self::Arc(arc) = self {
            if !arc.params().radius.is_finite() {
                return Err(GeometryError::NonFinite("arc radius"));
            }
        }
        let len = self.length();
        if len <= eps {
            return Err(GeometryError::Degenerate(format!(
                "boundary curve length {len} is below {eps}"
            )));
        }
        Ok(())
    }

    /// Returns `true` if [`validate`](Self::validate) rejects the curve.
    #[must_use]
    pub fn is_degenerate(&self, eps: f64) -> bool {
        self.validate(eps).is_err()
    }

    /// Returns the straight segment when the curve is a line.
    #[must_use]
    pub fn as_line(&self) -> Option<&LineSegment> {
        match self {
            Self::Line(line) => Some(line),
            Self::Arc(_) => None,
        }
    }
}

impl PlanCurve for WallCurve {
    fn length(&self) -> f64 {
        match self {
            Self::Line(c) => c.length(),
            Self::Arc(c) => c.length(),
        }
    }

    fn point_at(&self, d: f64) -> Point3 {
        match self {
            Self::Line(c) => c.point_at(d),
            Self::Arc(c) => c.point_at(d),
        }
    }

    fn tangent_at(&self, d: f64) -> Vector2 {
        match self {
            Self::Line(c) => c.tangent_at(d),
            Self::Arc(c) => c.tangent_at(d),
        }
    }

    fn project(&self, p: &Point3) -> CurveProjection {
        match self {
            Self::Line(c) => c.project(p),
            Self::Arc(c) => c.project(p),
        }
    }

    fn start(&self) -> Point3 {
        match self {
            Self::Line(c) => c.start(),
            Self::Arc(c) => c.start(),
        }
    }

    fn end(&self) -> Point3 {
        match self {
            Self::Line(c) => c.end(),
            Self::Arc(c) => c.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bulge_builds_line() {
        let c = WallCurve::arc(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0), 0.0);
        assert!(c.as_line().is_some());
        assert!((c.length() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_detection() {
        let p = Point3::new(1.0, 1.0, 0.0);
        assert!(WallCurve::line(p, p).is_degenerate(1e-6));
        let nan = Point3::new(f64::NAN, 0.0, 0.0);
        assert!(WallCurve::line(nan, p).is_degenerate(1e-6));
        assert!(!WallCurve::line(Point3::origin(), p).is_degenerate(1e-6));
    }

    #[test]
    fn validate_reports_the_cause() {
        let p = Point3::new(1.0, 1.0, 0.0);
        let nan = Point3::new(f64::NAN, 0.0, 0.0);
        assert!(matches!(
            WallCurve::line(nan, p).validate(1e-6),
            Err(GeometryError::NonFinite(_))
        ));
        assert!(matches!(
            WallCurve::line(p, p).validate(1e-6),
            Err(GeometryError::Degenerate(_))
        ));
        assert!(WallCurve::line(Point3::origin(), p).validate(1e-6).is_ok());
    }
}
