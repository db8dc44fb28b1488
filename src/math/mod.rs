pub mod arc_2d;
pub mod distance_2d;
pub mod interval;
pub mod units;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Default tolerance for comparisons along a wall, in geometry units.
///
/// Rule sets may override it; every interval and spacing comparison in the
/// engine goes through the configured value.
pub const TOLERANCE: f64 = 1e-6;

/// Planar (XY) distance between two points, ignoring Z.
#[must_use]
pub fn dist_xy(a: &Point3, b: &Point3) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Drops the Z component of a point.
#[must_use]
pub fn to_plan(p: &Point3) -> Point2 {
    Point2::new(p.x, p.y)
}
