use crate::math::{Point2, Point3};

/// Kind of wall opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpeningKind {
    Door,
    Window,
}

/// A door or window hosted in a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opening {
    /// Insertion point of the opening.
    pub position: Point3,
    /// Clear width, when the host reported a usable one.
    pub width: Option<f64>,
    pub kind: OpeningKind,
}

impl Opening {
    /// Creates a door.
    #[must_use]
    pub fn door(position: Point3, width: f64) -> Self {
        Self {
            position,
            width: Some(width),
            kind: OpeningKind::Door,
        }
    }

    /// Creates a window.
    #[must_use]
    pub fn window(position: Point3, width: f64) -> Self {
        Self {
            position,
            width: Some(width),
            kind: OpeningKind::Window,
        }
    }

    /// Returns the width when it is finite and positive.
    #[must_use]
    pub fn usable_width(&self) -> Option<f64> {
        self.width.filter(|w| w.is_finite() && *w > 0.0)
    }
}

/// Plan footprint of furniture that blocks the wall behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blocker {
    pub min: Point2,
    pub max: Point2,
}

impl Blocker {
    /// Creates a blocker from any two opposite corners.
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
}
