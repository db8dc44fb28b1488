//! Property-based tests for interval algebra and spacing filters.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use wallspan::math::interval::{invert, merge, total_length, Interval};
use wallspan::math::Point3;
use wallspan::placement::strategy::point_count;
use wallspan::placement::{DedupeGridMode, GridIndex, MinSpacingFilter};

const EPS: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Raw blocked intervals, possibly reversed, overlapping or out of range.
fn arb_intervals() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-50.0f64..150.0, -50.0f64..150.0), 0..12)
}

/// Points scattered over a 10 m square in the plan.
fn arb_points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..10_000.0, 0.0f64..10_000.0), 0..60)
}

fn to_points(raw: &[(f64, f64)]) -> Vec<Point3> {
    raw.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect()
}

// ---------------------------------------------------------------------------
// Blocked and free spans tile the wall.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn blocked_plus_free_covers_range(raw in arb_intervals()) {
        let intervals: Vec<Interval> = raw.iter().map(|&(a, b)| Interval::new(a, b)).collect();
        let blocked = merge(&intervals, 0.0, 100.0, EPS);
        let free = invert(&blocked, 0.0, 100.0, EPS);
        let sum = total_length(&blocked) + total_length(&free);
        // Gaps shorter than EPS are dropped, at most one per blocked interval.
        prop_assert!(sum <= 100.0 + EPS, "covered {} > range", sum);
        prop_assert!(sum >= 100.0 - EPS * (blocked.len() as f64 + 1.0), "covered {} < range", sum);
    }
}

proptest! {
    #[test]
    fn merged_intervals_are_sorted_and_disjoint(raw in arb_intervals()) {
        let intervals: Vec<Interval> = raw.iter().map(|&(a, b)| Interval::new(a, b)).collect();
        let blocked = merge(&intervals, 0.0, 100.0, EPS);
        for w in blocked.windows(2) {
            prop_assert!(w[0].hi + EPS < w[1].lo, "{:?} touches {:?}", w[0], w[1]);
        }
        for iv in &blocked {
            prop_assert!(iv.lo >= 0.0 && iv.hi <= 100.0);
        }
    }
}

proptest! {
    #[test]
    fn free_spans_avoid_blocked(raw in arb_intervals(), x in 0.0f64..100.0) {
        let intervals: Vec<Interval> = raw.iter().map(|&(a, b)| Interval::new(a, b)).collect();
        let blocked = merge(&intervals, 0.0, 100.0, EPS);
        let free = invert(&blocked, 0.0, 100.0, EPS);
        let in_free = free.iter().any(|f| x > f.lo + EPS && x < f.hi - EPS);
        let in_blocked = blocked.iter().any(|b| x > b.lo + EPS && x < b.hi - EPS);
        prop_assert!(!(in_free && in_blocked));
    }
}

// ---------------------------------------------------------------------------
// Min spacing is idempotent and leaves no close pairs.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn min_spacing_idempotent(raw in arb_points(), d in 100.0f64..2000.0) {
        let filter = MinSpacingFilter::new(d, DedupeGridMode::Planar);
        let (once, _) = filter.enforce(to_points(&raw)).unwrap();
        let (twice, skipped) = filter.enforce(once.clone()).unwrap();
        prop_assert_eq!(skipped, 0);
        prop_assert_eq!(once, twice);
    }
}

proptest! {
    #[test]
    fn min_spacing_leaves_no_close_pairs(raw in arb_points(), d in 100.0f64..2000.0) {
        let (kept, skipped) = MinSpacingFilter::new(d, DedupeGridMode::Planar)
            .enforce(to_points(&raw))
            .unwrap();
        prop_assert_eq!(kept.len() + skipped, raw.len());
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                prop_assert!(dist > d, "kept pair {} apart, min {}", dist, d);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Grid queries agree with a brute-force scan for any cell size.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn grid_matches_brute_force(
        raw in arb_points(),
        (qx, qy) in (0.0f64..10_000.0, 0.0f64..10_000.0),
        radius in 1.0f64..3000.0,
        cell in 50.0f64..2000.0,
    ) {
        let points = to_points(&raw);
        let mut index = GridIndex::new(cell, DedupeGridMode::Planar).unwrap();
        index.add_many(points.iter().copied());
        let q = Point3::new(qx, qy, 0.0);
        let brute = points
            .iter()
            .any(|p| ((p.x - qx).powi(2) + (p.y - qy).powi(2)).sqrt() <= radius);
        prop_assert_eq!(index.has_near(&q, radius), brute);
    }
}

// ---------------------------------------------------------------------------
// Point count covers the length without exceeding the spacing.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn point_count_step_within_spacing(len in 10.0f64..100_000.0, spacing in 500.0f64..5000.0) {
        let n = point_count(len, spacing, 1.0);
        prop_assert!(n >= 1);
        let step = len / n as f64;
        prop_assert!(step <= spacing + 1.0 / n as f64 + EPS, "step {} > spacing {}", step, spacing);
    }
}
