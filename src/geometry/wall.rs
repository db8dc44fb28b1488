use std::fmt;
use std::ops::BitOr;

use serde::Serialize;

use super::curve::{PlanCurve, WallCurve};
use crate::math::{Point3, Vector2};

/// Host element id of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct WallId(pub u64);

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wall#{}", self.0)
    }
}

/// Classification bits attached to a wall.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WallFlags(u8);

impl WallFlags {
    pub const EXTERIOR: Self = Self(1);
    pub const FACADE: Self = Self(1 << 1);
    pub const STRUCTURAL: Self = Self(1 << 2);
    pub const MONOLITH: Self = Self(1 << 3);
    pub const CURTAIN: Self = Self(1 << 4);

    /// No flags set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Sets the bits of `other` when `on` is true, clears them otherwise.
    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Returns `true` if no flags are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for WallFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for WallFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::EXTERIOR, "EXTERIOR"),
            (Self::FACADE, "FACADE"),
            (Self::STRUCTURAL, "STRUCTURAL"),
            (Self::MONOLITH, "MONOLITH"),
            (Self::CURTAIN, "CURTAIN"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "WallFlags({})", set.join(" | "))
    }
}

/// Explicit function parameter of a wall type, when the host provides one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallFunction {
    Interior,
    Exterior,
    Foundation,
    Retaining,
    Soffit,
    CoreShaft,
}

/// Construction kind of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallKind {
    #[default]
    Basic,
    Curtain,
    Stacked,
}

/// Wall metadata extracted once by the host adapter.
///
/// Every field the classifier looks at is explicit; unknown values stay
/// `None` and are treated permissively.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WallMetadata {
    pub id: WallId,
    pub name: String,
    pub type_name: String,
    pub width: f64,
    pub function: Option<WallFunction>,
    pub structural_usage: Option<bool>,
    pub kind: WallKind,
}

impl WallMetadata {
    /// Creates metadata for a basic wall with the given type name.
    #[must_use]
    pub fn new(id: WallId, type_name: impl Into<String>, width: f64) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            width,
            ..Self::default()
        }
    }

    /// Name and type name joined for keyword matching, lowercased.
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut text = String::with_capacity(self.name.len() + self.type_name.len() + 1);
        for part in [&self.name, &self.type_name] {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(part);
        }
        text.to_lowercase()
    }
}

/// One room boundary segment bound to its classified wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub id: WallId,
    pub curve: WallCurve,
    pub width: f64,
    pub flags: WallFlags,
}

impl WallSegment {
    /// Start point of the segment.
    #[must_use]
    pub fn p0(&self) -> Point3 {
        self.curve.start()
    }

    /// End point of the segment.
    #[must_use]
    pub fn p1(&self) -> Point3 {
        self.curve.end()
    }

    /// Planar length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.curve.length()
    }

    /// Point at arc length `d`.
    #[must_use]
    pub fn point_at(&self, d: f64) -> Point3 {
        self.curve.point_at(d)
    }

    /// Unit tangent at arc length `d`.
    #[must_use]
    pub fn tangent_at(&self, d: f64) -> Vector2 {
        self.curve.tangent_at(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_algebra() {
        let mut f = WallFlags::empty();
        assert!(f.is_empty());
        f.insert(WallFlags::MONOLITH);
        f.set(WallFlags::FACADE, false);
        assert!(f.contains(WallFlags::MONOLITH));
        assert!(!f.contains(WallFlags::FACADE));
        let g = f | WallFlags::EXTERIOR;
        assert!(g.intersects(WallFlags::EXTERIOR | WallFlags::CURTAIN));
        assert!(!g.contains(WallFlags::EXTERIOR | WallFlags::CURTAIN));
        assert_eq!(format!("{g:?}"), "WallFlags(EXTERIOR | MONOLITH)");
    }

    #[test]
    fn set_false_clears_bits() {
        let mut f = WallFlags::EXTERIOR | WallFlags::FACADE;
        f.set(WallFlags::FACADE, false);
        assert!(f.contains(WallFlags::EXTERIOR));
        assert!(!f.contains(WallFlags::FACADE));
        f.set(WallFlags::FACADE, true);
        f.remove(WallFlags::EXTERIOR);
        assert_eq!(f, WallFlags::FACADE);
    }

    #[test]
    fn search_text_joins_and_lowercases() {
        let mut m = WallMetadata::new(WallId(7), "НР_Кирпич 250", 0.8);
        m.name = "  Wall 1 ".to_owned();
        assert_eq!(m.search_text(), "wall 1 нр_кирпич 250");
    }
}
