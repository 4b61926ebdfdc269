//! Cable contact scenarios against the reference world.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use sim_contact::{CollisionBackend, CollisionObject};
use sim_core::{MassProperties, ObstacleShape, Pose};
use sim_tendon::CableNetwork;

use super::common::{ball, cable_between, fixed_at, init_tracing, stiff_cable, world};

/// A ball resting on a taut cable is pushed away from it frame by frame.
#[test]
fn cable_pushes_free_ball_out() {
    init_tracing();
    let mut world = world();
    let a = fixed_at(&mut world, Point3::origin());
    let b = fixed_at(&mut world, Point3::new(2.0, 0.0, 0.0));
    let obstacle = ball(&mut world, Point3::new(1.0, 0.0, 0.45), 0.5, 1.0);
    let mut cable = cable_between(&mut world, stiff_cable(), a, b);

    world.detect_contacts();
    cable.step(0.01, &mut world).unwrap();

    let contacts = cable.last_contacts();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].body, obstacle);
    assert_relative_eq!(contacts[0].depth, 0.06, epsilon = 1e-9);
    assert_relative_eq!(contacts[0].normal, Vector3::z(), epsilon = 1e-9);
    assert_relative_eq!(contacts[0].effective_mass, 1.0);

    // J = m · dt · T/L · |d| = 1 · 0.01 · 50 · 0.06
    let impulse = world.body(obstacle).unwrap().accumulated_impulse;
    assert_relative_eq!(impulse, Vector3::new(0.0, 0.0, 0.03), epsilon = 1e-9);

    world.integrate(0.01).unwrap();
    let mut previous_z = world.body(obstacle).unwrap().pose.position.z;
    assert!(previous_z > 0.45);

    for _ in 0..50 {
        world.detect_contacts();
        cable.step(0.01, &mut world).unwrap();
        world.integrate(0.01).unwrap();

        let z = world.body(obstacle).unwrap().pose.position.z;
        assert!(z >= previous_z, "ball moved back toward the cable");
        previous_z = z;
    }
    assert!(world.body(obstacle).unwrap().velocity.z > 0.0);
}

/// Static obstacles are reported but receive no impulse.
#[test]
fn static_obstacle_gets_zero_impulse() {
    let mut world = world();
    let a = fixed_at(&mut world, Point3::origin());
    let b = fixed_at(&mut world, Point3::new(2.0, 0.0, 0.0));
    let wall = world
        .add_obstacle(
            Pose::from_position(Point3::new(1.0, 0.0, 0.45)),
            MassProperties::fixed(),
            ObstacleShape::sphere(0.5),
        )
        .unwrap();
    let mut cable = cable_between(&mut world, stiff_cable(), a, b);

    world.detect_contacts();
    cable.step(0.01, &mut world).unwrap();

    let contacts = cable.last_contacts();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].body, wall);
    assert_eq!(contacts[0].effective_mass, 0.0);
    assert_eq!(contacts[0].impulse, Vector3::zeros());
    assert_eq!(world.body(wall).unwrap().accumulated_impulse, Vector3::zeros());
}

/// Anchor bodies overlap the cable ends but are never pushed.
#[test]
fn anchor_bodies_are_excluded() {
    let mut world = world();
    let a = world
        .add_obstacle(
            Pose::from_position(Point3::origin()),
            MassProperties::new(1.0),
            ObstacleShape::sphere(0.1),
        )
        .unwrap();
    let b = world
        .add_obstacle(
            Pose::from_position(Point3::new(2.0, 0.0, 0.0)),
            MassProperties::new(1.0),
            ObstacleShape::cuboid(Vector3::new(0.1, 0.1, 0.1)),
        )
        .unwrap();
    let mut cable = cable_between(&mut world, stiff_cable(), a, b);

    world.detect_contacts();
    assert_eq!(world.overlapping_pairs(cable.proxy_id()).len(), 2);

    cable.step(0.01, &mut world).unwrap();
    assert!(cable.last_contacts().is_empty());
    for body in [a, b] {
        assert_eq!(world.body(body).unwrap().accumulated_impulse, Vector3::zeros());
    }

    // Anchors still feel the tension
    assert_relative_eq!(
        world.body(a).unwrap().accumulated_force,
        Vector3::new(100.0, 0.0, 0.0),
        epsilon = 1e-9
    );
}

/// A cable lying on the ground touches it at both ends.
#[test]
fn cable_on_ground_plane() {
    let mut world = world();
    let ground = world
        .add_obstacle(Pose::identity(), MassProperties::fixed(), ObstacleShape::ground())
        .unwrap();
    let a = fixed_at(&mut world, Point3::new(0.0, 0.0, 0.005));
    let b = fixed_at(&mut world, Point3::new(2.0, 0.0, 0.005));
    let mut cable = cable_between(&mut world, stiff_cable(), a, b);

    world.detect_contacts();
    cable.step(0.01, &mut world).unwrap();

    let contacts = cable.last_contacts();
    assert_eq!(contacts.len(), 2);
    for contact in contacts {
        assert_eq!(contact.body, ground);
        assert_relative_eq!(contact.depth, 0.005, epsilon = 1e-12);
        assert_relative_eq!(contact.normal, -Vector3::z(), epsilon = 1e-12);
    }
}

/// A box straddling the cable is pushed out through its nearest face.
#[test]
fn box_straddling_cable_is_pushed_through_nearest_face() {
    let mut world = world();
    let a = fixed_at(&mut world, Point3::new(0.0, 0.0, 0.0));
    let b = fixed_at(&mut world, Point3::new(0.0, 2.0, 0.0));
    let crate_body = world
        .add_obstacle(
            Pose::from_position(Point3::new(0.0, 1.0, -0.29)),
            MassProperties::new(3.0),
            ObstacleShape::cuboid(Vector3::new(0.3, 0.3, 0.3)),
        )
        .unwrap();
    let mut cable = cable_between(&mut world, stiff_cable(), a, b);

    world.detect_contacts();
    cable.step(0.01, &mut world).unwrap();

    let contacts = cable.last_contacts();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].body, crate_body);
    assert_relative_eq!(contacts[0].normal, -Vector3::z(), epsilon = 1e-6);
    assert_relative_eq!(contacts[0].depth, 0.02, epsilon = 1e-6);

    let impulse = world.body(crate_body).unwrap().accumulated_impulse;
    assert!(impulse.z < 0.0);
    assert_relative_eq!(impulse.x, 0.0, epsilon = 1e-12);
}

/// Proxies follow their anchors; stale pairs vanish on the next detection.
#[test]
fn proxy_tracks_moving_anchor() {
    let mut world = world();
    let a = fixed_at(&mut world, Point3::origin());
    let b = world
        .add_body(Pose::from_position(Point3::new(2.0, 0.0, 0.0)), MassProperties::new(1.0))
        .unwrap();
    let obstacle = ball(&mut world, Point3::new(1.0, 0.0, 0.45), 0.5, 1.0);
    let mut cable = cable_between(&mut world, stiff_cable(), a, b);

    world.detect_contacts();
    cable.step(0.01, &mut world).unwrap();
    assert_eq!(cable.last_contacts().len(), 1);

    // Swing the free end away from the ball
    world.integrate(0.01).unwrap();
    world
        .set_pose(b, Pose::from_position(Point3::new(0.0, 0.0, -2.0)))
        .unwrap();
    world.set_velocity(b, Vector3::zeros()).unwrap();
    world.detect_contacts();
    cable.step(0.01, &mut world).unwrap();

    assert!(cable.last_contacts().is_empty());
    let (_, pose) = world.proxy(cable.proxy_id()).unwrap();
    assert_relative_eq!(pose.position, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    assert!(!world
        .overlapping_pairs(cable.proxy_id())
        .iter()
        .any(|pair| pair.involves(CollisionObject::Body(obstacle))));
}

/// Contacts follow the proxy's geometry at step time, not the last detection.
#[test]
fn anchors_moved_after_detection_use_current_geometry() {
    let mut world = world();
    let a = fixed_at(&mut world, Point3::origin());
    let b = fixed_at(&mut world, Point3::new(2.0, 0.0, 0.0));
    let obstacle = ball(&mut world, Point3::new(1.0, 0.0, 0.45), 0.5, 1.0);
    let mut cable = cable_between(&mut world, stiff_cable(), a, b);

    world.detect_contacts();
    assert_eq!(world.overlapping_pairs(cable.proxy_id()).len(), 1);

    for (body, x) in [(a, 0.0), (b, 2.0)] {
        world
            .set_pose(body, Pose::from_position(Point3::new(x, 10.0, 0.0)))
            .unwrap();
    }
    cable.step(0.01, &mut world).unwrap();

    assert!(cable.last_contacts().is_empty());
    assert_eq!(world.body(obstacle).unwrap().accumulated_impulse, Vector3::zeros());
    assert!(world.overlapping_pairs(cable.proxy_id()).is_empty());

    // Moving back picks the ball up again without a detection pass
    for (body, x) in [(a, 0.0), (b, 2.0)] {
        world
            .set_pose(body, Pose::from_position(Point3::new(x, 0.0, 0.0)))
            .unwrap();
    }
    cable.step(0.01, &mut world).unwrap();

    let contacts = cable.last_contacts();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].body, obstacle);
    assert_relative_eq!(contacts[0].depth, 0.06, epsilon = 1e-9);
}

/// Tearing down the network releases every proxy.
#[test]
fn network_teardown_releases_proxies() {
    let mut world = world();
    let a = fixed_at(&mut world, Point3::origin());
    let b = fixed_at(&mut world, Point3::new(1.0, 0.0, 0.0));
    let c = fixed_at(&mut world, Point3::new(0.0, 1.0, 0.0));

    let mut network = CableNetwork::new();
    network.add(cable_between(&mut world, stiff_cable(), a, b));
    network.add(cable_between(&mut world, stiff_cable(), b, c));
    assert_eq!(world.proxy_count(), 2);

    network.teardown(&mut world).unwrap();
    assert!(network.is_empty());
    assert_eq!(world.proxy_count(), 0);
}
