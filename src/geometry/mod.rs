pub mod curve;
pub mod opening;
pub mod room;
pub mod wall;

pub use curve::{ArcSegment, CurveProjection, LineSegment, PlanCurve, WallCurve};
pub use opening::{Blocker, Opening, OpeningKind};
pub use room::{BoundarySegment, Room};
pub use wall::{WallFlags, WallFunction, WallId, WallKind, WallMetadata, WallSegment};
