use crate::config::Rules;
use crate::geometry::Room;
use crate::placement::path::AllowedPath;
use crate::placement::{Candidate, CandidateKind};

use super::PlacementStrategy;

/// Number of points needed to cover `length` at `spacing`.
///
/// `tolerance` is subtracted first so lengths a hair above a multiple of the
/// spacing do not gain a point. Never less than one for a positive length.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn point_count(length: f64, spacing: f64, tolerance: f64) -> usize {
    if !length.is_finite() || length <= 0.0 || !spacing.is_finite() || spacing <= 0.0 {
        return 0;
    }
    let n = ((length - tolerance) / spacing).ceil();
    if n < 1.0 {
        1
    } else {
        n as usize
    }
}

/// Emits `count` points at `k * step`, `k = 1..=count`, along the path.
///
/// With an end clearance, each point is clamped inside its span, and a span
/// too short for the clearance hands the point to the next one.
#[allow(clippy::cast_precision_loss)]
pub(super) fn walk(
    path: &AllowedPath,
    count: usize,
    step: f64,
    end_clearance: f64,
    eps: f64,
    kind: CandidateKind,
) -> Vec<Candidate> {
    let spans = &path.spans;
    let mut out: Vec<Candidate> = Vec::with_capacity(count);
    let mut idx = 0;
    let mut start = 0.0;
    let mut last: Option<(usize, f64)> = None;

    for k in 1..=count {
        let target = step * k as f64;
        while idx < spans.len() && target > start + spans[idx].len() + eps {
            start += spans[idx].len();
            idx += 1;
        }
        if idx >= spans.len() {
            break;
        }

        let mut local = target - start;
        if end_clearance > eps {
            while idx < spans.len() && spans[idx].len() + eps < 2.0 * end_clearance {
                start += spans[idx].len();
                idx += 1;
                local = 0.0;
            }
            if idx >= spans.len() {
                break;
            }
            let hi = (spans[idx].len() - end_clearance).max(end_clearance);
            local = local.clamp(end_clearance, hi);
        }
        local = local.clamp(0.0, spans[idx].len());

        if last.is_some_and(|(i, d)| i == idx && (d - local).abs() <= eps) {
            continue;
        }
        last = Some((idx, local));

        let span = &spans[idx];
        out.push(Candidate {
            wall: span.wall,
            point: span.point_at(local),
            direction: span.tangent_at(local),
            priority: 0,
            kind,
        });
    }
    out
}

/// Evenly spaced points over the whole path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSpacing {
    pub spacing: f64,
    pub count_tolerance: f64,
    pub end_clearance: f64,
    pub epsilon: f64,
}

impl FixedSpacing {
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self {
            spacing: rules.spacing,
            count_tolerance: rules.count_tolerance,
            end_clearance: rules.wall_end_clearance,
            epsilon: rules.epsilon,
        }
    }

    /// Keeps points at least `clearance` away from each span end.
    #[must_use]
    pub fn with_end_clearance(mut self, clearance: f64) -> Self {
        self.end_clearance = clearance;
        self
    }
}

impl PlacementStrategy for FixedSpacing {
    #[allow(clippy::cast_precision_loss)]
    fn generate(&self, path: &AllowedPath, _room: &Room) -> Vec<Candidate> {
        let len = path.total_length;
        if len <= self.epsilon {
            return Vec::new();
        }
        let count = point_count(len, self.spacing, self.count_tolerance);
        if count == 0 {
            return Vec::new();
        }
        let step = len / count as f64;
        walk(path, count, step, self.end_clearance, self.epsilon, CandidateKind::General)
    }
}

/// Point count taken from a reference length, spread over the walkable path.
///
/// Used when the count must follow the full wall length while placement
/// avoids openings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountFromLength {
    pub count_length: f64,
    pub spacing: f64,
    pub count_tolerance: f64,
    pub epsilon: f64,
}

impl CountFromLength {
    #[must_use]
    pub fn new(count_length: f64, rules: &Rules) -> Self {
        Self {
            count_length,
            spacing: rules.spacing,
            count_tolerance: rules.count_tolerance,
            epsilon: rules.epsilon,
        }
    }
}

impl PlacementStrategy for CountFromLength {
    #[allow(clippy::cast_precision_loss)]
    fn generate(&self, path: &AllowedPath, _room: &Room) -> Vec<Candidate> {
        let len = path.total_length;
        let count = point_count(self.count_length, self.spacing, self.count_tolerance);
        if count == 0 || len <= self.epsilon {
            return Vec::new();
        }
        let step = len / count as f64;
        walk(path, count, step, 0.0, self.epsilon, CandidateKind::General)
    }
}

/// `count` points centred in equal slices of the path.
///
/// The count drops until slices are at least `min_spacing` long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centered {
    pub count: usize,
    pub min_spacing: f64,
    pub epsilon: f64,
}

impl PlacementStrategy for Centered {
    #[allow(clippy::cast_precision_loss)]
    fn generate(&self, path: &AllowedPath, _room: &Room) -> Vec<Candidate> {
        let len = path.total_length;
        if self.count == 0 || len <= self.epsilon {
            return Vec::new();
        }
        let mut count = self.count;
        while count > 1 && len / (count as f64) + self.epsilon < self.min_spacing {
            count -= 1;
        }
        let step = len / count as f64;

        let mut out = Vec::with_capacity(count);
        let mut idx = 0;
        let mut start = 0.0;
        for i in 0..count {
            let target = (i as f64 + 0.5) * step;
            while idx + 1 < path.spans.len() && target > start + path.spans[idx].len() {
                start += path.spans[idx].len();
                idx += 1;
            }
            let Some(span) = path.spans.get(idx) else {
                break;
            };
            let local = target - start;
            out.push(Candidate {
                wall: span.wall,
                point: span.point_at(local),
                direction: span.tangent_at(local),
                priority: 0,
                kind: CandidateKind::Centered,
            });
        }
        out
    }
}
