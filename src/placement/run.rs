use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::Rules;
use crate::error::{PlacementError, Result};
use crate::geometry::Room;
use crate::math::{dist_xy, Point3};

use super::dedupe::{DedupeGridMode, GridIndex};
use super::path::{BlockedBreakdown, BoundaryPathBuilder, WallSource};
use super::spacing::MinSpacingFilter;
use super::strategy::PlacementStrategy;
use super::Candidate;

/// A disc around an existing element (e.g. a radiator) where nothing may be
/// placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidZone {
    pub center: Point3,
    pub radius: f64,
}

impl AvoidZone {
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    #[must_use]
    pub fn contains(&self, p: &Point3) -> bool {
        dist_xy(&self.center, p) <= self.radius
    }
}

/// Outcome of one room.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomReport {
    pub room: String,
    pub created: usize,
    pub skipped_spacing: usize,
    pub skipped_avoid: usize,
    pub skipped_duplicate: usize,
    pub allowed_length: f64,
    pub breakdown: BlockedBreakdown,
    /// Accepted candidates, in placement order.
    #[serde(skip)]
    pub candidates: Vec<Candidate>,
}

impl RoomReport {
    /// Candidates dropped for any reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped_spacing + self.skipped_avoid + self.skipped_duplicate
    }
}

/// Totals over every room of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub source_model: Option<String>,
    pub rooms_processed: usize,
    pub rooms_skipped_geometry: usize,
    pub rooms_skipped_policy: usize,
    pub created: usize,
    pub skipped: usize,
    pub allowed_length: f64,
    pub breakdown: BlockedBreakdown,
}

/// Per-run state: validated rules, the run-wide dedupe index and the avoid
/// zones. One writer; rooms are processed one after another.
#[derive(Debug)]
pub struct RunContext {
    rules: Rules,
    index: GridIndex,
    avoid: Vec<AvoidZone>,
    summary: RunSummary,
}

impl RunContext {
    /// Creates a context with an empty index.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when neither the dedupe radius nor the spacing
    /// yields a usable grid cell size.
    pub fn new(rules: Rules) -> Result<Self> {
        let cell = if rules.dedupe_radius > rules.epsilon {
            rules.dedupe_radius
        } else {
            rules.spacing
        };
        let index = GridIndex::new(cell, DedupeGridMode::Planar)?;
        Ok(Self {
            rules,
            index,
            avoid: Vec::new(),
            summary: RunSummary::default(),
        })
    }

    /// Labels the run with the model the geometry came from.
    #[must_use]
    pub fn with_source_model(mut self, label: impl Into<String>) -> Self {
        self.summary.source_model = Some(label.into());
        self
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Loads points placed by earlier runs so new ones do not duplicate them.
    pub fn seed_existing<I: IntoIterator<Item = Point3>>(&mut self, points: I) {
        self.index.add_many(points);
    }

    pub fn add_avoid_zone(&mut self, zone: AvoidZone) {
        self.avoid.push(zone);
    }

    /// Number of points in the run-wide index.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    #[must_use]
    pub fn into_summary(self) -> RunSummary {
        self.summary
    }

    /// Builds the allowed path of `room`, generates candidates and keeps the
    /// ones that pass min spacing, avoid zones and the run-wide dedupe.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::RoomSkipped` when the room has no allowed
    /// path; the skip is still counted in the summary.
    #[instrument(skip(self, room, walls, strategy), fields(room = %room.name))]
    pub fn process_room(
        &mut self,
        room: &Room,
        walls: &impl WallSource,
        strategy: &impl PlacementStrategy,
    ) -> Result<RoomReport> {
        let path = match BoundaryPathBuilder::new(&self.rules).build(room, walls) {
            Ok(path) => path,
            Err(err) => {
                if let PlacementError::RoomSkipped {
                    reason, breakdown, ..
                } = &err
                {
                    if reason.is_geometric() {
                        self.summary.rooms_skipped_geometry += 1;
                    } else {
                        self.summary.rooms_skipped_policy += 1;
                    }
                    self.summary.breakdown.accumulate(breakdown);
                    warn!(%reason, perimeter = breakdown.perimeter, "room skipped");
                }
                return Err(err);
            }
        };

        let mut candidates = strategy.generate(&path, room);
        candidates.sort_by_key(|c| c.priority);

        let mut report = RoomReport {
            room: room.name.clone(),
            allowed_length: path.total_length,
            breakdown: path.breakdown,
            ..RoomReport::default()
        };

        if self.rules.min_spacing > self.rules.epsilon {
            let (kept, skipped) =
                MinSpacingFilter::new(self.rules.min_spacing, DedupeGridMode::Planar)
                    .enforce(candidates)?;
            candidates = kept;
            report.skipped_spacing = skipped;
        }

        for candidate in candidates {
            if self.avoid.iter().any(|z| z.contains(&candidate.point)) {
                report.skipped_avoid += 1;
                continue;
            }
            if self.index.has_near(&candidate.point, self.rules.dedupe_radius) {
                report.skipped_duplicate += 1;
                continue;
            }
            self.index.add(candidate.point);
            report.candidates.push(candidate);
        }
        report.created = report.candidates.len();

        self.summary.rooms_processed += 1;
        self.summary.created += report.created;
        self.summary.skipped += report.skipped();
        self.summary.allowed_length += report.allowed_length;
        self.summary.breakdown.accumulate(&report.breakdown);

        info!(
            created = report.created,
            skipped = report.skipped(),
            allowed = report.allowed_length,
            "room processed"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::error::SkipReason;
    use crate::geometry::{Opening, WallId, WallMetadata};
    use crate::math::units::LengthUnit;
    use crate::placement::path::WallCatalog;
    use crate::placement::strategy::FixedSpacing;

    fn setup() -> (RunContext, Room, WallCatalog) {
        let rules = RuleConfig {
            spacing_mm: 2500.0,
            ..RuleConfig::for_unit(LengthUnit::Millimetres)
        }
        .validate()
        .unwrap();
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4000.0, 0.0, 0.0),
            Point3::new(4000.0, 3000.0, 0.0),
            Point3::new(0.0, 3000.0, 0.0),
        ];
        let walls = [WallId(1), WallId(2), WallId(3), WallId(4)];
        let room = Room::from_loop("Bedroom", &corners, &walls);
        let mut catalog = WallCatalog::new();
        for id in 1..=4 {
            catalog.insert(WallMetadata::new(WallId(id), "Перегородка 100", 100.0));
        }
        catalog.add_opening(WallId(1), Opening::door(Point3::new(2000.0, 0.0, 0.0), 900.0));
        (RunContext::new(rules).unwrap(), room, catalog)
    }

    #[test]
    fn second_pass_is_fully_deduped() {
        let (mut ctx, room, catalog) = setup();
        let strategy = FixedSpacing::from_rules(ctx.rules());
        let first = ctx.process_room(&room, &catalog, &strategy).unwrap();
        assert_eq!(first.created, 5);
        let second = ctx.process_room(&room, &catalog, &strategy).unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped_duplicate, 5);
        assert_eq!(ctx.summary().created, 5);
        assert_eq!(ctx.placed(), 5);
    }

    #[test]
    fn avoid_zone_and_seeded_points() {
        let (mut ctx, room, catalog) = setup();
        ctx.add_avoid_zone(AvoidZone::new(Point3::new(4000.0, 2500.0, 0.0), 200.0));
        ctx.seed_existing([Point3::new(2000.0, 3100.0, 0.0)]);
        let strategy = FixedSpacing::from_rules(ctx.rules());
        let report = ctx.process_room(&room, &catalog, &strategy).unwrap();
        assert_eq!(report.skipped_avoid, 1);
        assert_eq!(report.skipped_duplicate, 1);
        assert_eq!(report.created, 3);
    }

    #[test]
    fn min_spacing_runs_before_dedupe() {
        let (ctx, room, catalog) = setup();
        let mut rules = ctx.rules().clone();
        rules.min_spacing = 3000.0;
        let mut ctx = RunContext::new(rules).unwrap();
        let strategy = FixedSpacing::from_rules(ctx.rules());
        let report = ctx.process_room(&room, &catalog, &strategy).unwrap();
        assert!(report.skipped_spacing > 0);
        assert_eq!(report.created + report.skipped_spacing, 5);
    }

    #[test]
    fn skipped_room_is_counted() {
        let (mut ctx, room, _) = setup();
        let strategy = FixedSpacing::from_rules(ctx.rules());
        let err = ctx.process_room(&room, &WallCatalog::new(), &strategy).unwrap_err();
        assert!(matches!(
            err,
            PlacementError::RoomSkipped { reason: SkipReason::DegenerateGeometry, .. }
        ));
        let summary = ctx.into_summary();
        assert_eq!(summary.rooms_skipped_geometry, 1);
        assert_eq!(summary.rooms_processed, 0);
        assert!((summary.breakdown.minus_unresolved - 14000.0).abs() < 1e-6);
    }

    #[test]
    fn summary_serializes() {
        let (ctx, _, _) = setup();
        let json = serde_json::to_string(&ctx.with_source_model("AR_Linked.rvt").into_summary())
            .unwrap();
        assert!(json.contains("\"source_model\":\"AR_Linked.rvt\""));
        assert!(json.contains("\"minus_openings\":0.0"));
    }
}
