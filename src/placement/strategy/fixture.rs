use crate::config::Rules;
use crate::geometry::{PlanCurve, Room, WallSegment};
use crate::math::{Point3, Vector2};
use crate::placement::path::AllowedPath;
use crate::placement::{Candidate, CandidateKind};

use super::PlacementStrategy;

/// A plumbing or appliance fixture that sockets are placed next to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixture {
    pub point: Point3,
    /// Distance along the wall from the fixture to its socket.
    pub offset: f64,
    pub priority: i32,
}

/// Sockets at a fixed offset from one fixture, optionally paired with a
/// second fixture (sink and stove).
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetFromFixture {
    pub primary: Fixture,
    pub partner: Option<Fixture>,
    /// Fixtures farther than this from every wall get no sockets.
    pub max_wall_distance: f64,
    /// How much farther an aligned wall may be and still win.
    pub align_tolerance: f64,
    pub end_clearance: f64,
    pub max_per_fixture: usize,
    /// Also emit a socket midway between the two fixtures when they share a
    /// wall.
    pub between: bool,
    pub epsilon: f64,
}

impl OffsetFromFixture {
    #[must_use]
    pub fn new(primary: Fixture, rules: &Rules) -> Self {
        Self {
            primary,
            partner: None,
            max_wall_distance: rules.fixture_max_wall_distance,
            align_tolerance: rules.fixture_align_tolerance,
            end_clearance: rules.wall_end_clearance,
            max_per_fixture: 1,
            between: true,
            epsilon: rules.epsilon,
        }
    }

    #[must_use]
    pub fn with_partner(mut self, partner: Fixture) -> Self {
        self.partner = Some(partner);
        self
    }
}

/// A fixture projected onto its nearest wall.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    wall: WallSegment,
    /// Arc-length position of the fixture on `wall`.
    along: f64,
    /// Physical wall extent on the same parametrization.
    bounds: (f64, f64),
}

impl OffsetFromFixture {
    /// Nearest wall of the path to `point`, preferring one running toward
    /// `toward` when it is at most `align_tolerance` farther.
    fn nearest_wall(
        &self,
        path: &AllowedPath,
        point: &Point3,
        toward: Option<&Point3>,
    ) -> Option<WallSegment> {
        let mut walls: Vec<(WallSegment, f64)> = Vec::new();
        for span in &path.spans {
            if walls.iter().any(|(w, _)| w.id == span.wall.id && w.curve == span.wall.curve) {
                continue;
            }
            let offset = span.wall.curve.project(point).offset;
            if offset.is_finite() {
                walls.push((span.wall, offset));
            }
        }

        let &(nearest, best) = walls.iter().min_by(|a, b| a.1.total_cmp(&b.1))?;
        if best > self.max_wall_distance {
            return None;
        }

        let dir = toward.and_then(|t| {
            let v = Vector2::new(t.x - point.x, t.y - point.y);
            let n = v.norm();
            (n > self.epsilon).then(|| v / n)
        });
        let Some(dir) = dir else {
            return Some(nearest);
        };

        let aligned = walls
            .iter()
            .filter(|(w, d)| {
                *d <= best + self.align_tolerance
                    && *d <= self.max_wall_distance
                    && w.tangent_at(0.0).dot(&dir).abs() > 0.5
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        Some(aligned.map_or(nearest, |(w, _)| *w))
    }

    fn anchor(&self, path: &AllowedPath, room: &Room, wall: WallSegment, point: &Point3) -> Anchor {
        let len = wall.length();
        let along = wall.curve.project(point).distance_along.clamp(0.0, len);
        let mut bounds = (0.0, len);
        if wall.curve.as_line().is_some() {
            let ends = room
                .segments
                .iter()
                .filter(|s| s.wall == Some(wall.id) && !s.curve.is_degenerate(self.epsilon))
                .flat_map(|s| [s.curve.start(), s.curve.end()])
                .chain(
                    path.spans
                        .iter()
                        .filter(|s| s.wall.id == wall.id)
                        .flat_map(|s| [s.wall.p0(), s.wall.p1()]),
                )
                .map(|p| wall.curve.project(&p))
                .filter(|pr| pr.distance_along.is_finite());
            for pr in ends {
                // Only pieces collinear with the anchor wall extend it.
                let perpendicular = {
                    let over = if pr.distance_along < 0.0 {
                        -pr.distance_along
                    } else {
                        (pr.distance_along - len).max(0.0)
                    };
                    (pr.offset * pr.offset - over * over).max(0.0).sqrt()
                };
                if perpendicular <= wall.width.max(self.epsilon) {
                    bounds.0 = f64::min(bounds.0, pr.distance_along);
                    bounds.1 = f64::max(bounds.1, pr.distance_along);
                }
            }
        }
        Anchor { wall, along, bounds }
    }

    /// Point at `d` on the anchor wall's line, extended past its ends for
    /// straight walls.
    fn point_on(wall: &WallSegment, d: f64) -> Point3 {
        match wall.curve.as_line().and_then(|l| l.direction()) {
            Some(dir) => {
                let p0 = wall.p0();
                Point3::new(p0.x + dir.x * d, p0.y + dir.y * d, p0.z)
            }
            None => wall.point_at(d),
        }
    }

    /// Candidate at `d` on the anchor wall if it clears the wall ends and
    /// lies on the allowed path.
    fn place(
        &self,
        path: &AllowedPath,
        anchor: &Anchor,
        d: f64,
        priority: i32,
        kind: CandidateKind,
    ) -> Option<Candidate> {
        let (lo, hi) = anchor.bounds;
        let eps = self.epsilon;
        if d < lo + self.end_clearance - eps || d > hi - self.end_clearance + eps {
            return None;
        }
        let point = Self::point_on(&anchor.wall, d);
        path.spans.iter().find_map(|span| {
            if span.wall.id != anchor.wall.id {
                return None;
            }
            let pr = span.wall.curve.project(&point);
            let inside = pr.offset <= eps * 10.0
                && pr.distance_along >= span.lo - eps
                && pr.distance_along <= span.hi + eps;
            inside.then(|| Candidate {
                wall: span.wall,
                point,
                direction: span.wall.tangent_at(pr.distance_along),
                priority,
                kind,
            })
        })
    }

    fn around(
        &self,
        path: &AllowedPath,
        anchor: &Anchor,
        fixture: &Fixture,
        other_along: Option<f64>,
    ) -> Vec<Candidate> {
        // Away from the partner first; without one, backwards first.
        let away = match other_along {
            Some(o) if o < anchor.along => 1.0,
            _ => -1.0,
        };
        let mut out = Vec::new();
        for sign in [away, -away] {
            if out.len() >= self.max_per_fixture {
                break;
            }
            let d = anchor.along + sign * fixture.offset;
            let kind = CandidateKind::FixtureOffset;
            if let Some(c) = self.place(path, anchor, d, fixture.priority, kind) {
                out.push(c);
            }
        }
        out
    }
}

impl PlacementStrategy for OffsetFromFixture {
    fn generate(&self, path: &AllowedPath, room: &Room) -> Vec<Candidate> {
        let primary = self.primary;
        let partner = self.partner;

        let Some(primary_wall) =
            self.nearest_wall(path, &primary.point, partner.as_ref().map(|p| &p.point))
        else {
            return Vec::new();
        };
        let primary_anchor = self.anchor(path, room, primary_wall, &primary.point);

        let partner_anchor = partner.and_then(|p| {
            let wall = self.nearest_wall(path, &p.point, Some(&primary.point))?;
            Some((p, self.anchor(path, room, wall, &p.point)))
        });
        let shared = partner_anchor.filter(|(_, a)| a.wall.id == primary_anchor.wall.id);

        let mut out = Vec::new();
        if self.between {
            if let Some((_, other)) = shared {
                let other_along = primary_anchor
                    .wall
                    .curve
                    .project(&Self::point_on(&other.wall, other.along))
                    .distance_along;
                let mid = (primary_anchor.along + other_along) * 0.5;
                out.extend(self.place(path, &primary_anchor, mid, 0, CandidateKind::Between));
            }
        }

        let partner_along_on_primary = shared.map(|(_, a)| {
            primary_anchor
                .wall
                .curve
                .project(&Self::point_on(&a.wall, a.along))
                .distance_along
        });
        out.extend(self.around(path, &primary_anchor, &primary, partner_along_on_primary));

        if let Some((fixture, anchor)) = partner_anchor {
            let primary_along = shared.map(|(_, a)| {
                a.wall
                    .curve
                    .project(&Self::point_on(&primary_anchor.wall, primary_anchor.along))
                    .distance_along
            });
            out.extend(self.around(path, &anchor, &fixture, primary_along));
        }
        out
    }
}
