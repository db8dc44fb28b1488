use serde::Deserialize;

/// Millimetres per foot.
pub const MM_PER_FOOT: f64 = 304.8;

/// Square metres per square foot.
pub const SQM_PER_SQFT: f64 = 0.092_903_04;

/// Converts millimetres to feet.
#[must_use]
pub fn mm_to_ft(mm: f64) -> f64 {
    mm / MM_PER_FOOT
}

/// Converts feet to millimetres.
#[must_use]
pub fn ft_to_mm(ft: f64) -> f64 {
    ft * MM_PER_FOOT
}

/// Converts square feet to square metres.
#[must_use]
pub fn sqft_to_sqm(sqft: f64) -> f64 {
    sqft * SQM_PER_SQFT
}

/// Length unit of the host geometry handed to the engine.
///
/// Rule files are written in millimetres; the geometry is usually in the
/// host's internal unit (feet for most BIM hosts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Feet,
    Millimetres,
    Metres,
}

impl LengthUnit {
    /// Converts a length in millimetres into this unit.
    #[must_use]
    pub fn convert_mm(self, mm: f64) -> f64 {
        match self {
            Self::Feet => mm_to_ft(mm),
            Self::Millimetres => mm,
            Self::Metres => mm / 1000.0,
        }
    }

    /// Converts a length in this unit back to millimetres.
    #[must_use]
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Feet => ft_to_mm(value),
            Self::Millimetres => value,
            Self::Metres => value * 1000.0,
        }
    }

    /// Converts an area in square metres into this unit squared.
    #[must_use]
    pub fn convert_sqm(self, sqm: f64) -> f64 {
        let per_m = self.convert_mm(1000.0);
        sqm * per_m * per_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foot_round_trip() {
        assert!((mm_to_ft(304.8) - 1.0).abs() < 1e-12);
        assert!((ft_to_mm(mm_to_ft(1234.5)) - 1234.5).abs() < 1e-9);
    }

    #[test]
    fn area_in_feet() {
        // 10 m² is about 107.64 ft².
        let a = LengthUnit::Feet.convert_sqm(10.0);
        assert!((sqft_to_sqm(a) - 10.0).abs() < 1e-9, "a={a}");
    }

    #[test]
    fn millimetre_area() {
        let a = LengthUnit::Millimetres.convert_sqm(1.0);
        assert!((a - 1.0e6).abs() < 1e-6);
    }
}
