//! 1-D interval algebra over a wall's arc-length parametrization.
//!
//! Blocked spans (openings, corners, furniture) are merged into a sorted,
//! non-overlapping set and then inverted into the free spans of the wall.

/// A closed span `[lo, hi]` along a wall, in geometry units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    /// Creates an interval, swapping the bounds if they are reversed.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            Self { lo: b, hi: a }
        } else {
            Self { lo: a, hi: b }
        }
    }

    /// Length of the interval.
    #[must_use]
    pub fn len(&self) -> f64 {
        self.hi - self.lo
    }

    /// Returns `true` if the interval is no longer than `eps`.
    #[must_use]
    pub fn is_degenerate(&self, eps: f64) -> bool {
        self.len() <= eps
    }

    /// Returns `true` if `x` lies inside the interval, widened by `eps`.
    #[must_use]
    pub fn contains(&self, x: f64, eps: f64) -> bool {
        x >= self.lo - eps && x <= self.hi + eps
    }
}

/// Clips `intervals` to `[lo, hi]` and merges overlapping or touching ones.
///
/// Reversed inputs are swapped first; intervals entirely outside the range
/// are dropped. Neighbours closer than `eps` are joined. The result is
/// sorted by `lo` and non-overlapping. Returns nothing when `hi <= lo`.
#[must_use]
pub fn merge(intervals: &[Interval], lo: f64, hi: f64, eps: f64) -> Vec<Interval> {
    if hi <= lo {
        return Vec::new();
    }

    let mut cleaned: Vec<Interval> = intervals
        .iter()
        .map(|iv| Interval::new(iv.lo, iv.hi))
        .filter(|iv| iv.hi > lo && iv.lo < hi)
        .map(|iv| Interval {
            lo: iv.lo.max(lo),
            hi: iv.hi.min(hi),
        })
        .collect();
    if cleaned.is_empty() {
        return Vec::new();
    }

    cleaned.sort_by(|a, b| a.lo.total_cmp(&b.lo));

    let mut merged = Vec::with_capacity(cleaned.len());
    let mut cur = cleaned[0];
    for iv in &cleaned[1..] {
        if iv.lo <= cur.hi + eps {
            cur.hi = cur.hi.max(iv.hi);
        } else {
            merged.push(cur);
            cur = *iv;
        }
    }
    merged.push(cur);
    merged
}

/// Returns the complement of `blocked` within `[lo, hi]`.
///
/// `blocked` must be sorted and non-overlapping, as produced by [`merge`].
/// Gaps no longer than `eps` are not reported.
#[must_use]
pub fn invert(blocked: &[Interval], lo: f64, hi: f64, eps: f64) -> Vec<Interval> {
    if hi <= lo {
        return Vec::new();
    }

    let mut free = Vec::with_capacity(blocked.len() + 1);
    let mut cur = lo;
    for iv in blocked {
        if iv.lo > cur + eps {
            free.push(Interval { lo: cur, hi: iv.lo.min(hi) });
        }
        cur = cur.max(iv.hi);
        if cur >= hi - eps {
            break;
        }
    }
    if cur < hi - eps {
        free.push(Interval { lo: cur, hi });
    }
    free
}

/// Sum of the lengths of `intervals`.
#[must_use]
pub fn total_length(intervals: &[Interval]) -> f64 {
    intervals.iter().map(Interval::len).sum()
}
