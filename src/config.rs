//! Rule configuration.
//!
//! [`RuleConfig`] mirrors the rule files the placement tools ship with:
//! every length is in millimetres, areas in square metres. The host loads
//! it however it likes (usually JSON) and calls [`RuleConfig::validate`]
//! once, which rejects bad numbers and converts everything into the
//! geometry unit the host hands to the engine.

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::math::units::LengthUnit;
use crate::math::TOLERANCE;
use crate::placement::classify::{ClassifierRules, KeywordSet};
use crate::placement::path::{ExclusionRules, PathRules, WindowPolicy};
use crate::placement::project::OpeningRules;

const DEFAULT_EXTERIOR_PATTERNS: &[&str] = &[
    "наруж", "внеш", "фасад", "нр_", "nr_", "exterior", "outside", "facade",
];
const DEFAULT_FACADE_PATTERNS: &[&str] = &["фасад", "нр_", "nr_", "facade", "вент"];
const DEFAULT_MONOLITH_PATTERNS: &[&str] = &[
    "кж", "монолит", "монол", "железобет", "жб", "бетон", "concrete", "struct",
];
const DEFAULT_STRUCTURAL_PATTERNS: &[&str] = &["несущ", "load-bearing", "bearing"];
const DEFAULT_CURTAIN_PATTERNS: &[&str] = &["curtain", "витраж", "витрин"];

/// Externally loaded rule set, in millimetres.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Unit of the geometry the host passes in.
    pub unit: LengthUnit,
    /// Comparison tolerance in geometry units.
    pub epsilon: f64,

    pub spacing_mm: f64,
    /// Slack subtracted from the path length before counting, so a path a
    /// hair longer than a spacing multiple does not get an extra point.
    pub count_tolerance_mm: f64,
    pub min_spacing_mm: f64,
    pub dedupe_radius_mm: f64,
    pub wall_end_clearance_mm: f64,
    pub corner_clearance_mm: f64,

    pub door_clearance_mm: f64,
    pub window_clearance_mm: f64,
    pub default_door_width_mm: f64,
    pub default_window_width_mm: f64,
    pub opening_wall_tolerance_mm: f64,
    pub opening_end_extension_mm: f64,
    pub window_policy: WindowPolicy,

    pub blocker_margin_mm: f64,
    pub blocker_max_distance_mm: f64,

    pub hallway_area_sqm: f64,
    pub fixture_max_wall_distance_mm: f64,
    pub fixture_align_tolerance_mm: f64,

    pub skip_exterior_walls: bool,
    pub skip_facade_walls: bool,
    pub skip_structural_walls: bool,
    pub skip_monolith_walls: bool,
    pub exterior_by_boundary_geometry: bool,
    pub exterior_requires_openings: bool,
    pub exterior_min_segment_mm: f64,
    pub exterior_min_opening_width_mm: f64,

    pub exterior_wall_name_patterns: Vec<String>,
    pub facade_wall_name_patterns: Vec<String>,
    pub monolith_wall_name_patterns: Vec<String>,
    pub structural_wall_name_patterns: Vec<String>,
    pub curtain_wall_name_patterns: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            unit: LengthUnit::Feet,
            epsilon: TOLERANCE,
            spacing_mm: 3000.0,
            count_tolerance_mm: 1.0,
            min_spacing_mm: 0.0,
            dedupe_radius_mm: 300.0,
            wall_end_clearance_mm: 0.0,
            corner_clearance_mm: 0.0,
            door_clearance_mm: 300.0,
            window_clearance_mm: 0.0,
            default_door_width_mm: 900.0,
            default_window_width_mm: 1200.0,
            opening_wall_tolerance_mm: 609.6,
            opening_end_extension_mm: 0.0,
            window_policy: WindowPolicy::Block,
            blocker_margin_mm: 0.0,
            blocker_max_distance_mm: 500.0,
            hallway_area_sqm: 10.0,
            fixture_max_wall_distance_mm: 1500.0,
            fixture_align_tolerance_mm: 300.0,
            skip_exterior_walls: true,
            skip_facade_walls: true,
            skip_structural_walls: true,
            skip_monolith_walls: true,
            exterior_by_boundary_geometry: true,
            exterior_requires_openings: true,
            exterior_min_segment_mm: 500.0,
            exterior_min_opening_width_mm: 0.0,
            exterior_wall_name_patterns: Vec::new(),
            facade_wall_name_patterns: Vec::new(),
            monolith_wall_name_patterns: Vec::new(),
            structural_wall_name_patterns: Vec::new(),
            curtain_wall_name_patterns: Vec::new(),
        }
    }
}

/// Validated rules, every length already in geometry units.
#[derive(Debug, Clone)]
pub struct Rules {
    pub unit: LengthUnit,
    pub epsilon: f64,
    pub spacing: f64,
    pub count_tolerance: f64,
    pub min_spacing: f64,
    pub dedupe_radius: f64,
    pub wall_end_clearance: f64,
    /// Floor area (squared geometry units) up to which a hallway gets one point.
    pub hallway_area: f64,
    pub fixture_max_wall_distance: f64,
    pub fixture_align_tolerance: f64,
    pub classifier: ClassifierRules,
    pub exclusion: ExclusionRules,
    pub openings: OpeningRules,
    pub path: PathRules,
}

impl RuleConfig {
    /// Parses a JSON rule file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when the text is not a valid rule file.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e).into())
    }

    /// Rule set for geometry expressed in `unit`, all other values default.
    #[must_use]
    pub fn for_unit(unit: LengthUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    /// Checks every threshold and converts it into geometry units.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for NaN, infinite or negative values, and for
    /// a non-positive spacing or epsilon.
    pub fn validate(&self) -> Result<Rules> {
        let unit = self.unit;
        let len = |name: &'static str, mm: f64| -> std::result::Result<f64, ConfigError> {
            Ok(unit.convert_mm(non_negative(name, mm)?))
        };

        let epsilon = positive("epsilon", self.epsilon)?;
        let spacing = unit.convert_mm(positive("spacing_mm", self.spacing_mm)?);

        let classifier = ClassifierRules {
            exterior_by_geometry: self.exterior_by_boundary_geometry,
            exterior_requires_openings: self.exterior_requires_openings,
            exterior_min_segment: len("exterior_min_segment_mm", self.exterior_min_segment_mm)?,
            exterior_min_opening_width: len(
                "exterior_min_opening_width_mm",
                self.exterior_min_opening_width_mm,
            )?,
            exterior_keywords: KeywordSet::merged(
                DEFAULT_EXTERIOR_PATTERNS,
                &self.exterior_wall_name_patterns,
            ),
            facade_keywords: KeywordSet::merged(
                DEFAULT_FACADE_PATTERNS,
                &self.facade_wall_name_patterns,
            ),
            monolith_keywords: KeywordSet::merged(
                DEFAULT_MONOLITH_PATTERNS,
                &self.monolith_wall_name_patterns,
            ),
            structural_keywords: KeywordSet::merged(
                DEFAULT_STRUCTURAL_PATTERNS,
                &self.structural_wall_name_patterns,
            ),
            curtain_keywords: KeywordSet::merged(
                DEFAULT_CURTAIN_PATTERNS,
                &self.curtain_wall_name_patterns,
            ),
        };

        let exclusion = ExclusionRules {
            skip_exterior: self.skip_exterior_walls,
            skip_facade: self.skip_facade_walls,
            skip_structural: self.skip_structural_walls,
            skip_monolith: self.skip_monolith_walls,
        };

        let openings = OpeningRules {
            wall_tolerance: len("opening_wall_tolerance_mm", self.opening_wall_tolerance_mm)?,
            end_extension: len("opening_end_extension_mm", self.opening_end_extension_mm)?,
            door_clearance: len("door_clearance_mm", self.door_clearance_mm)?,
            window_clearance: len("window_clearance_mm", self.window_clearance_mm)?,
            default_door_width: unit
                .convert_mm(positive("default_door_width_mm", self.default_door_width_mm)?),
            default_window_width: unit
                .convert_mm(positive("default_window_width_mm", self.default_window_width_mm)?),
            blocker_margin: len("blocker_margin_mm", self.blocker_margin_mm)?,
            blocker_max_distance: len("blocker_max_distance_mm", self.blocker_max_distance_mm)?,
        };

        let path = PathRules {
            epsilon,
            corner_clearance: len("corner_clearance_mm", self.corner_clearance_mm)?,
            window_policy: self.window_policy,
        };

        Ok(Rules {
            unit,
            epsilon,
            spacing,
            count_tolerance: len("count_tolerance_mm", self.count_tolerance_mm)?,
            min_spacing: len("min_spacing_mm", self.min_spacing_mm)?,
            dedupe_radius: len("dedupe_radius_mm", self.dedupe_radius_mm)?,
            wall_end_clearance: len("wall_end_clearance_mm", self.wall_end_clearance_mm)?,
            hallway_area: unit
                .convert_sqm(non_negative("hallway_area_sqm", self.hallway_area_sqm)?),
            fixture_max_wall_distance: len(
                "fixture_max_wall_distance_mm",
                self.fixture_max_wall_distance_mm,
            )?,
            fixture_align_tolerance: len(
                "fixture_align_tolerance_mm",
                self.fixture_align_tolerance_mm,
            )?,
            classifier,
            exclusion,
            openings,
            path,
        })
    }
}

fn finite(name: &'static str, value: f64) -> std::result::Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> std::result::Result<f64, ConfigError> {
    if finite(name, value)? < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(value)
}

fn positive(name: &'static str, value: f64) -> std::result::Result<f64, ConfigError> {
    if finite(name, value)? <= 0.0 {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(value)
}
