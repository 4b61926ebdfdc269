//! Shared fixtures for cable scenarios.

use nalgebra::Point3;
use sim_core::{BodyId, CableWorld, MassProperties, ObstacleShape, Pose, WorldConfig};
use sim_tendon::{Anchor, CableActuator, CableConfig};

/// Install a test subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Zero-gravity world with a tight contact margin.
pub fn world() -> CableWorld {
    CableWorld::new(WorldConfig::zero_gravity().with_contact_margin(0.001))
}

/// Immovable body at `position`.
pub fn fixed_at(world: &mut CableWorld, position: Point3<f64>) -> BodyId {
    world
        .add_static_body(Pose::from_position(position))
        .unwrap_or_else(|e| panic!("static body: {e}"))
}

/// Free sphere obstacle.
pub fn ball(world: &mut CableWorld, centre: Point3<f64>, radius: f64, mass: f64) -> BodyId {
    world
        .add_obstacle(
            Pose::from_position(centre),
            MassProperties::new(mass),
            ObstacleShape::sphere(radius),
        )
        .unwrap_or_else(|e| panic!("obstacle: {e}"))
}

/// Stiff pretensioned cable, 100 N at its start length.
pub fn stiff_cable() -> CableConfig {
    CableConfig::new(1000.0, 0.0).with_pretension(100.0)
}

/// Cable between two body origins.
pub fn cable_between(
    world: &mut CableWorld,
    config: CableConfig,
    a: BodyId,
    b: BodyId,
) -> CableActuator {
    CableActuator::new(config, Anchor::at_origin(a), Anchor::at_origin(b), world)
        .unwrap_or_else(|e| panic!("cable: {e}"))
}
