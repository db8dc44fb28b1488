use crate::error::Result;

use super::dedupe::{DedupeGridMode, GridIndex};
use super::Located;

/// Greedy minimum-distance thinning.
///
/// Items are accepted in input order, so callers express priority by
/// sorting before calling [`MinSpacingFilter::enforce`].
#[derive(Debug, Clone, Copy)]
pub struct MinSpacingFilter {
    min_dist: f64,
    mode: DedupeGridMode,
}

impl MinSpacingFilter {
    #[must_use]
    pub fn new(min_dist: f64, mode: DedupeGridMode) -> Self {
        Self { min_dist, mode }
    }

    /// Keeps every item that is farther than `min_dist` from all items kept
    /// before it. Returns the kept items and how many were dropped.
    ///
    /// A non-positive distance keeps everything.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when `min_dist` is NaN or infinite.
    pub fn enforce<T: Located>(&self, items: Vec<T>) -> Result<(Vec<T>, usize)> {
        if !self.min_dist.is_nan() && self.min_dist <= 0.0 {
            return Ok((items, 0));
        }
        let mut index = GridIndex::new(self.min_dist, self.mode)?;
        let mut kept = Vec::with_capacity(items.len());
        let mut skipped = 0;
        for item in items {
            let p = item.location();
            if index.has_near(&p, self.min_dist) {
                skipped += 1;
            } else {
                index.add(p);
                kept.push(item);
            }
        }
        Ok((kept, skipped))
    }
}
