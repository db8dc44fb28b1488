//! Walks a small apartment and prints where sockets and lights would go.
//!
//! Usage:
//! ```text
//! cargo run --example room_walk
//! RUST_LOG=wallspan=debug cargo run --example room_walk
//! ```

use wallspan::geometry::{Opening, Room, WallFunction, WallId, WallMetadata};
use wallspan::math::Point3;
use wallspan::placement::{
    AvoidZone, Fixture, FixedSpacing, Hallway, OffsetFromFixture, RunContext, Strategy,
    WallCatalog,
};
use wallspan::{PlacementError, RuleConfig};

fn rect(name: &str, x0: f64, y0: f64, x1: f64, y1: f64, walls: [u64; 4]) -> Room {
    let corners = [
        Point3::new(x0, y0, 300.0),
        Point3::new(x1, y0, 300.0),
        Point3::new(x1, y1, 300.0),
        Point3::new(x0, y1, 300.0),
    ];
    Room::from_loop(name, &corners, &walls.map(WallId))
}

fn catalog() -> WallCatalog {
    let mut walls = WallCatalog::new();
    for (id, name) in [
        (1, "Перегородка 100"),
        (2, "Перегородка 100"),
        (3, "Перегородка 100"),
        (4, "Перегородка 100"),
        (5, "КЖ_Стена 200"),
        (6, "Перегородка 100"),
        (7, "Перегородка 100"),
        (8, "Перегородка 100"),
        (10, "Перегородка 100"),
        (11, "Перегородка 100"),
    ] {
        walls.insert(WallMetadata::new(WallId(id), name, 100.0));
    }
    let mut facade = WallMetadata::new(WallId(9), "Кирпич 380", 380.0);
    facade.function = Some(WallFunction::Exterior);
    walls.insert(facade);

    walls.add_opening(WallId(1), Opening::door(Point3::new(2000.0, 0.0, 0.0), 900.0));
    walls.add_opening(WallId(6), Opening::door(Point3::new(5500.0, 0.0, 0.0), 800.0));
    walls
}

fn main() -> Result<(), PlacementError> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("wallspan=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let rules = RuleConfig::from_json(r#"{ "unit": "millimetres", "spacing_mm": 3000 }"#)?
        .validate()?;
    let walls = catalog();

    let mut ctx = RunContext::new(rules)?.with_source_model("demo");
    ctx.add_avoid_zone(AvoidZone::new(Point3::new(0.0, 1500.0, 0.0), 400.0));

    let bedroom = rect("Bedroom", 0.0, 0.0, 4000.0, 3000.0, [1, 2, 3, 4]);
    let kitchen = rect("Kitchen", 4000.0, 0.0, 7000.0, 3000.0, [6, 7, 8, 5]);
    let hall = rect("Hall", 0.0, -1500.0, 7000.0, 0.0, [9, 10, 11, 10]);

    let general = Strategy::from(FixedSpacing::from_rules(ctx.rules()));
    let sink = Fixture {
        point: Point3::new(5000.0, 2700.0, 0.0),
        offset: 600.0,
        priority: 1,
    };
    let stove = Fixture {
        point: Point3::new(6400.0, 2700.0, 0.0),
        offset: 400.0,
        priority: 2,
    };
    let kitchen_sockets =
        Strategy::from(OffsetFromFixture::new(sink, ctx.rules()).with_partner(stove));
    let hall_lights = Strategy::from(Hallway::from_rules(ctx.rules()));

    for (room, strategy) in [
        (&bedroom, &general),
        (&kitchen, &kitchen_sockets),
        (&hall, &hall_lights),
    ] {
        match ctx.process_room(room, &walls, strategy) {
            Ok(report) => {
                println!(
                    "{}: {} placed, {} skipped, {:.0} mm walkable",
                    report.room,
                    report.created,
                    report.skipped(),
                    report.allowed_length
                );
                for c in &report.candidates {
                    println!(
                        "  {:?} on {} at ({:.0}, {:.0})",
                        c.kind, c.wall.id, c.point.x, c.point.y
                    );
                }
            }
            Err(PlacementError::RoomSkipped { room, reason, .. }) => {
                println!("{room}: skipped ({reason})");
            }
            Err(err) => return Err(err),
        }
    }

    let summary = ctx.into_summary();
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).unwrap_or_default()
    );
    Ok(())
}
