use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::Rules;
use crate::error::{PlacementError, Result, SkipReason};
use crate::geometry::{
    Opening, OpeningKind, PlanCurve, Room, WallFlags, WallId, WallMetadata, WallSegment,
};
use crate::math::interval::{self, Interval};
use crate::math::{Point3, Vector2};

use super::classify::{BoundaryContext, WallClassifier};
use super::project::OpeningProjector;

/// What to do with a wall that hosts a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Block the window span only.
    #[default]
    Block,
    /// Drop the whole boundary segment.
    SkipWall,
}

/// Path-level thresholds, in geometry units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRules {
    pub epsilon: f64,
    pub corner_clearance: f64,
    pub window_policy: WindowPolicy,
}

/// Which wall classes the caller wants kept off the path.
///
/// Curtain walls are always excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExclusionRules {
    pub skip_exterior: bool,
    pub skip_facade: bool,
    pub skip_structural: bool,
    pub skip_monolith: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exclusion {
    Curtain,
    Exterior,
    Facade,
    Structural,
}

impl ExclusionRules {
    fn exclusion(&self, flags: WallFlags) -> Option<Exclusion> {
        if flags.contains(WallFlags::CURTAIN) {
            Some(Exclusion::Curtain)
        } else if self.skip_exterior && flags.contains(WallFlags::EXTERIOR) {
            Some(Exclusion::Exterior)
        } else if self.skip_facade && flags.contains(WallFlags::FACADE) {
            Some(Exclusion::Facade)
        } else if (self.skip_structural && flags.contains(WallFlags::STRUCTURAL))
            || (self.skip_monolith && flags.contains(WallFlags::MONOLITH))
        {
            Some(Exclusion::Structural)
        } else {
            None
        }
    }
}

/// Where the perimeter of a room went.
///
/// `perimeter` equals the sum of every other field up to floating-point
/// noise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BlockedBreakdown {
    pub perimeter: f64,
    pub minus_curtain: f64,
    pub minus_exterior: f64,
    pub minus_facade: f64,
    /// Structural and monolith walls.
    pub minus_structural: f64,
    /// Zero-length segments, room separators and walls without metadata.
    pub minus_unresolved: f64,
    pub minus_openings: f64,
    pub minus_corners: f64,
    pub minus_blockers: f64,
    pub allowed: f64,
}

impl BlockedBreakdown {
    /// Adds every field of `other` to `self`.
    pub fn accumulate(&mut self, other: &Self) {
        self.perimeter += other.perimeter;
        self.minus_curtain += other.minus_curtain;
        self.minus_exterior += other.minus_exterior;
        self.minus_facade += other.minus_facade;
        self.minus_structural += other.minus_structural;
        self.minus_unresolved += other.minus_unresolved;
        self.minus_openings += other.minus_openings;
        self.minus_corners += other.minus_corners;
        self.minus_blockers += other.minus_blockers;
        self.allowed += other.allowed;
    }
}

/// A free stretch `[lo, hi]` of one wall segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSpan {
    pub wall: WallSegment,
    pub lo: f64,
    pub hi: f64,
}

impl PathSpan {
    #[must_use]
    pub fn len(&self) -> f64 {
        self.hi - self.lo
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    /// Point `offset` into the span, clamped to it.
    #[must_use]
    pub fn point_at(&self, offset: f64) -> Point3 {
        self.wall.point_at(self.wall_distance(offset))
    }

    /// Wall tangent `offset` into the span.
    #[must_use]
    pub fn tangent_at(&self, offset: f64) -> Vector2 {
        self.wall.tangent_at(self.wall_distance(offset))
    }

    /// Midpoint of the span.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        self.point_at(self.len() * 0.5)
    }

    fn wall_distance(&self, offset: f64) -> f64 {
        (self.lo + offset).clamp(self.lo, self.hi)
    }
}

/// Walkable wall length of a room, in boundary traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowedPath {
    pub spans: Vec<PathSpan>,
    pub total_length: f64,
    pub breakdown: BlockedBreakdown,
}

impl AllowedPath {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Longest span, first one on ties.
    #[must_use]
    pub fn longest_span(&self) -> Option<&PathSpan> {
        self.spans
            .iter()
            .reduce(|best, s| if s.len() > best.len() { s } else { best })
    }
}

/// Host seam for wall metadata and hosted openings.
pub trait WallSource {
    /// Metadata of the wall, or `None` when it cannot be resolved.
    fn wall(&self, id: WallId) -> Option<&WallMetadata>;

    /// Openings hosted by the wall.
    fn openings(&self, id: WallId) -> &[Opening];
}

/// In-memory [`WallSource`].
#[derive(Debug, Clone, Default)]
pub struct WallCatalog {
    walls: FxHashMap<WallId, WallMetadata>,
    openings: FxHashMap<WallId, Vec<Opening>>,
}

impl WallCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a wall.
    pub fn insert(&mut self, meta: WallMetadata) {
        self.walls.insert(meta.id, meta);
    }

    /// Hosts `opening` in wall `id`.
    pub fn add_opening(&mut self, id: WallId, opening: Opening) {
        self.openings.entry(id).or_default().push(opening);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

impl WallSource for WallCatalog {
    fn wall(&self, id: WallId) -> Option<&WallMetadata> {
        self.walls.get(&id)
    }

    fn openings(&self, id: WallId) -> &[Opening] {
        self.openings.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Builds the allowed path of a room from its boundary.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryPathBuilder<'a> {
    rules: &'a Rules,
}

impl<'a> BoundaryPathBuilder<'a> {
    #[must_use]
    pub fn new(rules: &'a Rules) -> Self {
        Self { rules }
    }

    /// Walks the boundary and collects the free spans of every kept wall.
    ///
    /// Segments that cannot be resolved are skipped and counted in the
    /// breakdown.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::RoomSkipped` when the room yields no allowed
    /// length, with the reason and the breakdown gathered so far.
    #[instrument(skip(self, room, walls), fields(room = %room.name))]
    pub fn build(&self, room: &Room, walls: &impl WallSource) -> Result<AllowedPath> {
        if room.segments.is_empty() {
            return Err(skipped(room, SkipReason::NoBoundary, BlockedBreakdown::default()));
        }

        let eps = self.rules.path.epsilon;
        let classifier = WallClassifier::new(&self.rules.classifier);
        let projector = OpeningProjector::new(&self.rules.openings);

        let mut path = AllowedPath::default();
        let mut resolved = 0_usize;
        let mut kept = 0_usize;

        for (index, seg) in room.segments.iter().enumerate() {
            let len = seg.curve.length();
            if let Err(err) = seg.curve.validate(eps) {
                if len.is_finite() {
                    path.breakdown.perimeter += len;
                    path.breakdown.minus_unresolved += len;
                }
                debug!(index, %err, "boundary segment skipped");
                continue;
            }
            path.breakdown.perimeter += len;

            let Some((id, meta)) = seg.wall.and_then(|id| walls.wall(id).map(|m| (id, m))) else {
                path.breakdown.minus_unresolved += len;
                debug!(index, wall = ?seg.wall, "boundary segment without wall metadata");
                continue;
            };
            resolved += 1;

            // Only openings landing on this segment count, for blocking and
            // for the geometric exterior test alike.
            let openings = walls.openings(id);
            let mut opening_spans = Vec::with_capacity(openings.len());
            let mut widths = Vec::with_capacity(openings.len());
            let mut has_window = false;
            for opening in openings {
                match projector.project(opening, &seg.curve) {
                    Some(span) => {
                        has_window |= opening.kind == OpeningKind::Window;
                        widths.push(projector.width_of(opening));
                        opening_spans.push(span);
                    }
                    None => debug!(index, %id, kind = ?opening.kind, "opening not on segment"),
                }
            }

            let ctx = BoundaryContext {
                on_outer_boundary: seg.on_outer_boundary,
                segment_length: len,
                opening_widths: &widths,
            };
            let flags = classifier.classify(meta, &ctx);

            if let Some(exclusion) = self.rules.exclusion.exclusion(flags) {
                let bucket = match exclusion {
                    Exclusion::Curtain => &mut path.breakdown.minus_curtain,
                    Exclusion::Exterior => &mut path.breakdown.minus_exterior,
                    Exclusion::Facade => &mut path.breakdown.minus_facade,
                    Exclusion::Structural => &mut path.breakdown.minus_structural,
                };
                *bucket += len;
                debug!(index, %id, ?flags, "wall excluded");
                continue;
            }

            if has_window && self.rules.path.window_policy == WindowPolicy::SkipWall {
                path.breakdown.minus_openings += len;
                debug!(index, %id, "wall with window skipped");
                continue;
            }
            kept += 1;

            let segment = WallSegment {
                id,
                curve: seg.curve,
                width: meta.width,
                flags,
            };
            self.collect_spans(&mut path, segment, opening_spans, room);
        }

        if resolved == 0 {
            return Err(skipped(room, SkipReason::DegenerateGeometry, path.breakdown));
        }
        if kept == 0 {
            return Err(skipped(room, SkipReason::ExcludedByPolicy, path.breakdown));
        }
        if path.spans.is_empty() {
            return Err(skipped(room, SkipReason::FullyBlocked, path.breakdown));
        }

        debug!(
            spans = path.spans.len(),
            allowed = path.total_length,
            "allowed path built"
        );
        Ok(path)
    }

    fn collect_spans(
        &self,
        path: &mut AllowedPath,
        segment: WallSegment,
        mut blocked: Vec<Interval>,
        room: &Room,
    ) {
        let eps = self.rules.path.epsilon;
        let len = segment.length();
        let covered =
            |spans: &[Interval]| interval::total_length(&interval::merge(spans, 0.0, len, eps));

        let by_openings = covered(&blocked);

        let corner = self.rules.path.corner_clearance;
        if corner > eps {
            blocked.push(Interval::new(0.0, corner));
            blocked.push(Interval::new(len - corner, len));
        }
        let with_corners = covered(&blocked);

        let projector = OpeningProjector::new(&self.rules.openings);
        blocked.extend(
            room.blockers
                .iter()
                .filter_map(|b| projector.project_blocker(b, &segment.curve)),
        );
        let merged = interval::merge(&blocked, 0.0, len, eps);
        let with_blockers = interval::total_length(&merged);

        path.breakdown.minus_openings += by_openings;
        path.breakdown.minus_corners += with_corners - by_openings;
        path.breakdown.minus_blockers += with_blockers - with_corners;

        for free in interval::invert(&merged, 0.0, len, eps) {
            if free.len() <= eps {
                continue;
            }
            path.total_length += free.len();
            path.breakdown.allowed += free.len();
            path.spans.push(PathSpan {
                wall: segment,
                lo: free.lo,
                hi: free.hi,
            });
        }
    }
}

fn skipped(room: &Room, reason: SkipReason, breakdown: BlockedBreakdown) -> PlacementError {
    PlacementError::RoomSkipped {
        room: room.name.clone(),
        reason,
        breakdown,
    }
}
