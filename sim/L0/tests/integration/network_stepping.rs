//! Stepping a network of cables sharing bodies.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use sim_core::{BodyId, CableWorld, MassProperties, Pose};
use sim_tendon::{ActuatedModel, CableNetwork, LengthActuator};
use sim_types::SimError;

use super::common::{ball, cable_between, fixed_at, stiff_cable, world};

struct Scene {
    world: CableWorld,
    bodies: Vec<BodyId>,
}

/// Corner of two cables meeting at a free body, with a ball on the second.
fn corner_scene() -> Scene {
    let mut world = world();
    let a = fixed_at(&mut world, Point3::origin());
    let b = world
        .add_body(Pose::from_position(Point3::new(2.0, 0.0, 0.0)), MassProperties::new(1.0))
        .unwrap();
    let c = fixed_at(&mut world, Point3::new(2.0, 2.0, 0.0));
    let d = ball(&mut world, Point3::new(2.0, 1.0, 0.25), 0.3, 0.5);
    Scene {
        world,
        bodies: vec![a, b, c, d],
    }
}

fn accumulators(scene: &Scene) -> Vec<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> {
    scene
        .bodies
        .iter()
        .map(|id| {
            let body = scene.world.body(*id).unwrap();
            (
                body.accumulated_force,
                body.accumulated_torque,
                body.accumulated_impulse,
            )
        })
        .collect()
}

#[test]
fn step_result_does_not_depend_on_cable_order() {
    let mut forward = corner_scene();
    let (a, b, c) = (forward.bodies[0], forward.bodies[1], forward.bodies[2]);
    let mut forward_net = CableNetwork::new();
    forward_net.add(cable_between(&mut forward.world, stiff_cable(), a, b).with_name("ab"));
    forward_net.add(cable_between(&mut forward.world, stiff_cable(), b, c).with_name("bc"));

    let mut reverse = corner_scene();
    let mut reverse_net = CableNetwork::new();
    reverse_net.add(cable_between(&mut reverse.world, stiff_cable(), b, c).with_name("bc"));
    reverse_net.add(cable_between(&mut reverse.world, stiff_cable(), a, b).with_name("ab"));

    for (scene, net) in [(&mut forward, &mut forward_net), (&mut reverse, &mut reverse_net)] {
        scene.world.detect_contacts();
        net.step(0.01, &mut scene.world).unwrap();
    }

    let lhs = accumulators(&forward);
    let rhs = accumulators(&reverse);
    for (&(f1, t1, j1), &(f2, t2, j2)) in lhs.iter().zip(&rhs) {
        assert_relative_eq!(f1, f2, epsilon = 1e-12);
        assert_relative_eq!(t1, t2, epsilon = 1e-12);
        assert_relative_eq!(j1, j2, epsilon = 1e-12);
    }

    // The shared body is pulled toward both fixed ends
    let (force_b, _, _) = lhs[1];
    assert_relative_eq!(force_b, Vector3::new(-100.0, 100.0, 0.0), epsilon = 1e-9);

    // Only the second cable touches the ball
    let ball_contacts = forward_net.by_name("bc").unwrap().last_contacts();
    assert_eq!(ball_contacts.len(), 1);
    assert!(forward_net.by_name("ab").unwrap().last_contacts().is_empty());
}

#[test]
fn total_tension_sums_cables() {
    let mut scene = corner_scene();
    let (a, b, c) = (scene.bodies[0], scene.bodies[1], scene.bodies[2]);
    let mut network = CableNetwork::new();
    network.add(cable_between(&mut scene.world, stiff_cable(), a, b));
    network.add(cable_between(&mut scene.world, stiff_cable(), b, c));

    assert_eq!(network.total_tension(), 0.0);
    network.step(0.01, &mut scene.world).unwrap();
    assert_relative_eq!(network.total_tension(), 200.0, epsilon = 1e-9);

    let tensions: Vec<f64> = network.actuators().iter().map(LengthActuator::tension).collect();
    assert_eq!(tensions.len(), 2);
    assert_eq!(network.iter().count(), 2);
}

#[test]
fn network_rejects_bad_timestep() {
    let mut scene = corner_scene();
    let (a, b) = (scene.bodies[0], scene.bodies[1]);
    let mut network = CableNetwork::new();
    network.add(cable_between(&mut scene.world, stiff_cable(), a, b));

    for dt in [0.0, -1.0] {
        assert!(matches!(
            network.step(dt, &mut scene.world),
            Err(SimError::InvalidTimestep(_))
        ));
    }
    assert_eq!(network.total_tension(), 0.0);
}

#[test]
fn actuators_are_commanded_through_the_model() {
    let mut scene = corner_scene();
    let (a, b) = (scene.bodies[0], scene.bodies[1]);
    let mut network = CableNetwork::new();
    let index = network.add(cable_between(&mut scene.world, stiff_cable(), a, b));

    let cable = &mut network.actuators_mut()[index];
    LengthActuator::set_target_length(cable, 1.5).unwrap();
    LengthActuator::move_motors(cable, 0.1).unwrap();

    let cable = network.get(index).unwrap();
    assert_relative_eq!(cable.rest_length(), 1.8, epsilon = 1e-12);
    assert_relative_eq!(cable.target_length(), 1.5);
}
