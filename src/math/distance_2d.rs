use super::Point2;

/// Returns the minimum distance from point `(px, py)` to the line segment
/// from `(ax, ay)` to `(bx, by)`.
#[must_use]
pub fn point_to_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let (_, cx, cy) = closest_on_segment(px, py, ax, ay, bx, by);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Projects `(px, py)` onto the segment `(ax, ay) → (bx, by)`.
///
/// Returns `(t, cx, cy)` where `t` is the clamped normalized parameter in
/// `[0, 1]` and `(cx, cy)` is the closest point. A zero-length segment
/// returns its start point with `t = 0`.
#[must_use]
pub fn closest_on_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> (f64, f64, f64) {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        return (0.0, ax, ay);
    }

    let t = line_param(px, py, ax, ay, bx, by).clamp(0.0, 1.0);
    (t, ax + t * dx, ay + t * dy)
}

/// Unclamped normalized parameter of the projection of `(px, py)` onto the
/// infinite line through `(ax, ay)` and `(bx, by)`.
#[must_use]
pub fn line_param(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-20 {
        return 0.0;
    }
    ((px - ax) * dx + (py - ay) * dy) / len_sq
}

/// Minimum distance between an axis-aligned rectangle and a segment, in XY.
///
/// Zero when either segment end lies inside the rectangle. Otherwise the
/// smaller of the rectangle-corner-to-segment distances.
#[must_use]
pub fn rect_to_segment_dist(min: &Point2, max: &Point2, a: &Point2, b: &Point2) -> f64 {
    let inside = |p: &Point2| p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y;
    if inside(a) || inside(b) {
        return 0.0;
    }
    rect_corners(min, max)
        .iter()
        .map(|c| point_to_segment_dist(c.x, c.y, a.x, a.y, b.x, b.y))
        .fold(f64::INFINITY, f64::min)
}

/// The four corners of an axis-aligned rectangle, counter-clockwise.
#[must_use]
pub fn rect_corners(min: &Point2, max: &Point2) -> [Point2; 4] {
    [
        Point2::new(min.x, min.y),
        Point2::new(max.x, min.y),
        Point2::new(max.x, max.y),
        Point2::new(min.x, max.y),
    ]
}
