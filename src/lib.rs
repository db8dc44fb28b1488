pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod placement;

pub use config::{RuleConfig, Rules};
pub use error::{PlacementError, Result};
