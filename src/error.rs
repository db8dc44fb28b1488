use std::fmt;

use thiserror::Error;

use crate::placement::BlockedBreakdown;

/// Top-level error type for the wallspan placement engine.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("room '{room}' skipped: {reason}")]
    RoomSkipped {
        room: String,
        reason: SkipReason,
        breakdown: BlockedBreakdown,
    },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Errors raised while validating a rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} = {value} must be a finite number")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} = {value} must not be negative")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} = {value} must be greater than zero")]
    NotPositive { name: &'static str, value: f64 },

    #[error("invalid rule file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a whole room produced no allowed path.
///
/// Lets callers tell rooms dropped because of broken geometry apart from
/// rooms dropped by the exclusion rules they enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The room has no boundary segments at all.
    NoBoundary,
    /// Every boundary segment was zero-length or had no resolvable wall.
    DegenerateGeometry,
    /// Every resolvable wall was excluded by the classification rules.
    ExcludedByPolicy,
    /// Walls were kept but openings, corners and blockers cover all of them.
    FullyBlocked,
}

impl SkipReason {
    /// Returns `true` when the skip was caused by geometry rather than policy.
    #[must_use]
    pub fn is_geometric(self) -> bool {
        matches!(self, Self::NoBoundary | Self::DegenerateGeometry)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoBoundary => "no boundary segments",
            Self::DegenerateGeometry => "no usable wall geometry",
            Self::ExcludedByPolicy => "all walls excluded by rules",
            Self::FullyBlocked => "no free wall length left",
        };
        f.write_str(text)
    }
}

/// Convenience type alias for results using [`PlacementError`].
pub type Result<T> = std::result::Result<T, PlacementError>;
