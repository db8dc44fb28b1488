pub mod classify;
pub mod dedupe;
pub mod path;
pub mod project;
pub mod run;
pub mod spacing;
pub mod strategy;

use serde::Serialize;

use crate::geometry::WallSegment;
use crate::math::{Point3, Vector2};

pub use classify::{BoundaryContext, ClassifierRules, KeywordSet, WallClassifier};
pub use dedupe::{dedupe_against, DedupeGridMode, DedupeMode, GridIndex, SnapKeySet};
pub use path::{
    AllowedPath, BlockedBreakdown, BoundaryPathBuilder, ExclusionRules, PathRules, PathSpan,
    WallCatalog, WallSource, WindowPolicy,
};
pub use project::{OpeningProjector, OpeningRules};
pub use run::{AvoidZone, RoomReport, RunContext, RunSummary};
pub use spacing::MinSpacingFilter;
pub use strategy::{
    Centered, CountFromLength, Fixture, FixedSpacing, Hallway, OffsetFromFixture,
    PlacementStrategy, Strategy,
};

/// Why a candidate was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    General,
    Centered,
    Hallway,
    FixtureOffset,
    Between,
}

/// A proposed fixture position on a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub wall: WallSegment,
    pub point: Point3,
    /// Unit wall tangent at `point`.
    pub direction: Vector2,
    /// Lower values are placed first.
    pub priority: i32,
    pub kind: CandidateKind,
}

/// Anything with a position, for dedupe and spacing filters.
pub trait Located {
    fn location(&self) -> Point3;
}

impl Located for Point3 {
    fn location(&self) -> Point3 {
        *self
    }
}

impl Located for Candidate {
    fn location(&self) -> Point3 {
        self.point
    }
}
