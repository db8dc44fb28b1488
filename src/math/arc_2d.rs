//! 2D arc/bulge math for curved wall segments.
//!
//! Bulge convention: `bulge = tan(sweep_angle / 4)`.
//! - `bulge = 0`: straight line
//! - `bulge > 0`: counter-clockwise arc
//! - `bulge < 0`: clockwise arc
//! - `|bulge| = 1`: semicircle

use std::f64::consts::TAU;

/// Center-radius-angle form of a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcParams {
    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }
}

/// Converts a bulge-defined arc segment to center-radius-angle form.
///
/// Returns a zero-radius arc for zero-length chords or zero bulge.
#[must_use]
pub fn arc_from_bulge(x0: f64, y0: f64, x1: f64, y1: f64, bulge: f64) -> ArcParams {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let chord_len = (dx * dx + dy * dy).sqrt();

    if chord_len < 1e-12 || bulge.abs() < 1e-12 {
        return ArcParams {
            cx: x0,
            cy: y0,
            radius: 0.0,
            start_angle: 0.0,
            sweep: 0.0,
        };
    }

    // Distance from chord midpoint to center, in half-chord units.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mx = (x0 + x1) * 0.5;
    let my = (y0 + y1) * 0.5;

    // Left normal of the chord; the center sits on it for positive bulge.
    let nx = -dy / chord_len;
    let ny = dx / chord_len;

    let cx = mx + sagitta_ratio * (chord_len * 0.5) * nx;
    let cy = my + sagitta_ratio * (chord_len * 0.5) * ny;

    // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (y0 - cy).atan2(x0 - cx);
    let sweep = 4.0 * bulge.atan();

    ArcParams {
        cx,
        cy,
        radius,
        start_angle,
        sweep,
    }
}

/// Evaluates a point on an arc at normalized parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(arc: &ArcParams, t: f64) -> (f64, f64) {
    let angle = arc.start_angle + arc.sweep * t;
    (
        arc.cx + arc.radius * angle.cos(),
        arc.cy + arc.radius * angle.sin(),
    )
}

/// Computes the unit tangent direction on an arc at normalized parameter `t`.
///
/// The tangent points in the direction of increasing `t`.
#[must_use]
pub fn arc_tangent_at(arc: &ArcParams, t: f64) -> (f64, f64) {
    let angle = arc.start_angle + arc.sweep * t;
    let sign = if arc.sweep >= 0.0 { 1.0 } else { -1.0 };
    (-sign * angle.sin(), sign * angle.cos())
}

/// Maps a polar angle around the arc center to a normalized parameter.
///
/// Angles inside the swept range give `t` in `[0, 1]`. Angles outside it
/// are mapped to whichever end is angularly closer, giving `t < 0` or
/// `t > 1` so callers can measure how far past the end the point lies.
#[must_use]
pub fn arc_param_of_angle(arc: &ArcParams, angle: f64) -> f64 {
    let sweep_abs = arc.sweep.abs();
    if sweep_abs < 1e-12 {
        return 0.0;
    }
    // Angular travel from the start in the sweep direction, in [0, 2π).
    let raw = if arc.sweep >= 0.0 {
        angle - arc.start_angle
    } else {
        arc.start_angle - angle
    };
    let delta = raw.rem_euclid(TAU);
    if delta <= sweep_abs {
        return delta / sweep_abs;
    }
    let past_end = delta - sweep_abs;
    let before_start = TAU - delta;
    if past_end <= before_start {
        1.0 + past_end / sweep_abs
    } else {
        -before_start / sweep_abs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-9;

    #[test]
    fn semicircle_from_bulge() {
        // (1,0) -> (-1,0) with bulge 1: CCW semicircle through (0,1).
        let arc = arc_from_bulge(1.0, 0.0, -1.0, 0.0, 1.0);
        assert!(arc.cx.abs() < TOL && arc.cy.abs() < TOL, "{arc:?}");
        assert!((arc.radius - 1.0).abs() < TOL);
        assert!((arc.sweep - PI).abs() < TOL);
        let (x, y) = arc_point_at(&arc, 0.5);
        assert!(x.abs() < TOL && (y - 1.0).abs() < TOL, "({x}, {y})");
        assert!((arc.length() - PI).abs() < TOL);
    }

    #[test]
    fn tangent_follows_direction() {
        let arc = arc_from_bulge(1.0, 0.0, -1.0, 0.0, 1.0);
        let (tx, ty) = arc_tangent_at(&arc, 0.0);
        assert!(tx.abs() < TOL && (ty - 1.0).abs() < TOL);

        let cw = arc_from_bulge(-1.0, 0.0, 1.0, 0.0, -1.0);
        let (tx, ty) = arc_tangent_at(&cw, 0.0);
        assert!(tx.abs() < TOL && (ty - 1.0).abs() < TOL, "({tx}, {ty})");
    }

    #[test]
    fn param_of_angle_inside_and_outside() {
        let arc = arc_from_bulge(1.0, 0.0, -1.0, 0.0, 1.0);
        assert!((arc_param_of_angle(&arc, PI / 2.0) - 0.5).abs() < TOL);
        // Slightly below the start: negative parameter.
        assert!(arc_param_of_angle(&arc, -0.1) < 0.0);
        // Slightly past the end: parameter above one.
        assert!(arc_param_of_angle(&arc, PI + 0.1) > 1.0);
    }

    #[test]
    fn zero_bulge_is_degenerate() {
        let arc = arc_from_bulge(0.0, 0.0, 1.0, 0.0, 0.0);
        assert!(arc.radius.abs() < TOL);
    }
}
