mod fixture;
mod hallway;
mod linear;

pub use fixture::{Fixture, OffsetFromFixture};
pub use hallway::Hallway;
pub use linear::{point_count, Centered, CountFromLength, FixedSpacing};

use crate::geometry::Room;

use super::path::AllowedPath;
use super::Candidate;

/// Turns an allowed path into candidate positions.
pub trait PlacementStrategy {
    fn generate(&self, path: &AllowedPath, room: &Room) -> Vec<Candidate>;
}

/// Every built-in strategy, dispatched by value.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    FixedSpacing(FixedSpacing),
    CountFromLength(CountFromLength),
    Centered(Centered),
    Hallway(Hallway),
    OffsetFromFixture(OffsetFromFixture),
}

impl PlacementStrategy for Strategy {
    fn generate(&self, path: &AllowedPath, room: &Room) -> Vec<Candidate> {
        match self {
            Self::FixedSpacing(s) => s.generate(path, room),
            Self::CountFromLength(s) => s.generate(path, room),
            Self::Centered(s) => s.generate(path, room),
            Self::Hallway(s) => s.generate(path, room),
            Self::OffsetFromFixture(s) => s.generate(path, room),
        }
    }
}

impl From<FixedSpacing> for Strategy {
    fn from(s: FixedSpacing) -> Self {
        Self::FixedSpacing(s)
    }
}

impl From<CountFromLength> for Strategy {
    fn from(s: CountFromLength) -> Self {
        Self::CountFromLength(s)
    }
}

impl From<Centered> for Strategy {
    fn from(s: Centered) -> Self {
        Self::Centered(s)
    }
}

impl From<Hallway> for Strategy {
    fn from(s: Hallway) -> Self {
        Self::Hallway(s)
    }
}

impl From<OffsetFromFixture> for Strategy {
    fn from(s: OffsetFromFixture) -> Self {
        Self::OffsetFromFixture(s)
    }
}
