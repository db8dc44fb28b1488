use super::curve::WallCurve;
use super::opening::Blocker;
use super::wall::WallId;
use crate::math::Point3;

/// One edge of a room's boundary loop as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySegment {
    /// Owning wall, or `None` for room separation lines and other non-walls.
    pub wall: Option<WallId>,
    pub curve: WallCurve,
    /// Whether the segment lies on the building's outer boundary, if known.
    pub on_outer_boundary: Option<bool>,
}

impl BoundarySegment {
    /// Creates a straight segment owned by `wall`.
    #[must_use]
    pub fn wall_line(wall: WallId, p0: Point3, p1: Point3) -> Self {
        Self {
            wall: Some(wall),
            curve: WallCurve::line(p0, p1),
            on_outer_boundary: None,
        }
    }

    /// Marks the segment as lying (or not) on the outer boundary.
    #[must_use]
    pub fn with_outer_boundary(mut self, outer: bool) -> Self {
        self.on_outer_boundary = Some(outer);
        self
    }
}

/// A room as seen by the placement engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Room {
    pub name: String,
    /// Floor area in squared geometry units.
    pub area: f64,
    /// Outer boundary loop in traversal order.
    pub segments: Vec<BoundarySegment>,
    pub blockers: Vec<Blocker>,
}

impl Room {
    /// Creates a room from a closed loop of straight wall segments.
    ///
    /// `corners[i] → corners[i + 1]` is owned by `walls[i]`; the last corner
    /// connects back to the first. Area comes from the shoelace formula.
    #[must_use]
    pub fn from_loop(name: impl Into<String>, corners: &[Point3], walls: &[WallId]) -> Self {
        let n = corners.len().min(walls.len());
        let segments = (0..n)
            .map(|i| BoundarySegment::wall_line(walls[i], corners[i], corners[(i + 1) % n]))
            .collect();
        Self {
            name: name.into(),
            area: signed_area_2d(&corners[..n]).abs(),
            segments,
            blockers: Vec::new(),
        }
    }
}

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curve::PlanCurve;

    #[test]
    fn loop_room_area_and_segments() {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 3.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        let walls = [WallId(1), WallId(2), WallId(3), WallId(4)];
        let room = Room::from_loop("Bedroom", &corners, &walls);
        assert_eq!(room.segments.len(), 4);
        assert!((room.area - 12.0).abs() < 1e-12);
        let perimeter: f64 = room.segments.iter().map(|s| s.curve.length()).sum();
        assert!((perimeter - 14.0).abs() < 1e-12);
        assert_eq!(room.segments[3].wall, Some(WallId(4)));
    }

    #[test]
    fn signed_area_orientation() {
        let cw = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        assert!((signed_area_2d(&cw) + 1.0).abs() < 1e-12);
    }
}
