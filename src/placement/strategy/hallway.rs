use crate::config::Rules;
use crate::geometry::Room;
use crate::math::dist_xy;
use crate::placement::path::{AllowedPath, PathSpan};
use crate::placement::{Candidate, CandidateKind};

use super::PlacementStrategy;

/// Hallway lighting: one point for small hallways, the two farthest span
/// midpoints for larger ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hallway {
    /// Floor area, in squared geometry units, up to which one point is used.
    pub area_threshold: f64,
}

impl Hallway {
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self {
            area_threshold: rules.hallway_area,
        }
    }
}

fn at_midpoint(span: &PathSpan) -> Candidate {
    let half = span.len() * 0.5;
    Candidate {
        wall: span.wall,
        point: span.point_at(half),
        direction: span.tangent_at(half),
        priority: 0,
        kind: CandidateKind::Hallway,
    }
}

impl PlacementStrategy for Hallway {
    fn generate(&self, path: &AllowedPath, room: &Room) -> Vec<Candidate> {
        let Some(longest) = path.longest_span() else {
            return Vec::new();
        };
        if room.area <= self.area_threshold || path.spans.len() < 2 {
            return vec![at_midpoint(longest)];
        }

        let mids: Vec<_> = path.spans.iter().map(PathSpan::midpoint).collect();
        let mut best = (0, 1, f64::NEG_INFINITY);
        for i in 0..mids.len() {
            for j in i + 1..mids.len() {
                let d = dist_xy(&mids[i], &mids[j]);
                if d > best.2 {
                    best = (i, j, d);
                }
            }
        }
        vec![at_midpoint(&path.spans[best.0]), at_midpoint(&path.spans[best.1])]
    }
}
