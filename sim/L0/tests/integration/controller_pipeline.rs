//! Length controller driving a cable network through the frame loop.

use approx::assert_relative_eq;
use nalgebra::Point3;
use sim_control::{Controller, ControllerState, LengthController};
use sim_core::CableWorld;
use sim_tendon::CableNetwork;

use super::common::{cable_between, fixed_at, init_tracing, stiff_cable, world};

const DT: f64 = 0.1;

/// Three cables on a fixed triangle with 2 m sides.
fn triangle() -> (CableWorld, CableNetwork) {
    let mut world = world();
    let corners = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(1.0, 3.0_f64.sqrt(), 0.0),
    ];
    let bodies: Vec<_> = corners.iter().map(|p| fixed_at(&mut world, *p)).collect();

    let config = stiff_cable().with_target_velocity(0.5);
    let mut network = CableNetwork::new();
    for i in 0..3 {
        let cable = cable_between(&mut world, config, bodies[i], bodies[(i + 1) % 3]);
        network.add(cable.with_name(format!("cable_{i}")));
    }
    (world, network)
}

fn frame(
    world: &mut CableWorld,
    network: &mut CableNetwork,
    controller: &mut LengthController,
) {
    world.detect_contacts();
    controller.on_step(network, DT).unwrap();
    network.step(DT, world).unwrap();
    world.integrate(DT).unwrap();
}

fn rest_lengths(network: &CableNetwork) -> Vec<f64> {
    network.iter().map(|cable| cable.rest_length()).collect()
}

#[test]
fn controller_waits_then_drives_cables_to_targets() {
    init_tracing();
    let (mut world, mut network) = triangle();
    let mut controller = LengthController::with_seed(0.0, 2024).unwrap();

    controller.on_setup(&mut network).unwrap();
    assert_eq!(controller.state(), ControllerState::Armed);

    let initial = rest_lengths(&network);
    for (record, cable) in controller.records().iter().zip(network.iter()) {
        assert_relative_eq!(cable.start_length(), 2.0, epsilon = 1e-12);
        assert_eq!(cable.target_length(), record.target_length);
        assert!(record.target_length >= 1.3 && record.target_length < 2.5);
    }

    for _ in 0..15 {
        frame(&mut world, &mut network, &mut controller);
    }
    assert_eq!(rest_lengths(&network), initial);
    assert_eq!(controller.state(), ControllerState::Armed);

    // 2 s of motion at 0.5 m/s covers the whole band
    for _ in 15..42 {
        frame(&mut world, &mut network, &mut controller);
    }
    assert_eq!(controller.state(), ControllerState::Active);
    for (record, cable) in controller.records().iter().zip(network.iter()) {
        assert_relative_eq!(cable.rest_length(), record.target_length, epsilon = 1e-12);
    }
}

#[test]
fn motors_start_on_the_step_after_activation_time() {
    let (mut world, mut network) = triangle();
    let mut controller = LengthController::with_seed(0.0, 99).unwrap();
    controller.on_setup(&mut network).unwrap();
    let initial = rest_lengths(&network);

    // Twenty steps of 0.1 reach exactly the 2 s activation time
    for _ in 0..20 {
        frame(&mut world, &mut network, &mut controller);
    }
    assert_eq!(controller.state(), ControllerState::Armed);
    assert_eq!(rest_lengths(&network), initial);

    frame(&mut world, &mut network, &mut controller);
    assert_eq!(controller.state(), ControllerState::Active);
    for (before, after) in initial.iter().zip(rest_lengths(&network)) {
        let moved = (after - before).abs();
        assert!(moved > 1e-9 && moved <= 0.05 + 1e-12);
    }
}

#[test]
fn tension_follows_rest_length() {
    let (mut world, mut network) = triangle();
    let mut controller = LengthController::with_seed(0.0, 11).unwrap();
    controller.on_setup(&mut network).unwrap();

    for _ in 0..42 {
        frame(&mut world, &mut network, &mut controller);
    }

    for cable in &network {
        let expected = (1000.0 * (2.0 - cable.rest_length())).max(0.0);
        assert_relative_eq!(cable.tension(), expected, epsilon = 1e-6);
    }
}

#[test]
fn same_seed_reproduces_run() {
    let run = |seed| {
        let (mut world, mut network) = triangle();
        let mut controller = LengthController::with_seed(0.0, seed).unwrap();
        controller.on_setup(&mut network).unwrap();
        for _ in 0..25 {
            frame(&mut world, &mut network, &mut controller);
        }
        rest_lengths(&network)
    };

    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn teardown_returns_controller_to_uninitialized() {
    let (mut world, mut network) = triangle();
    let mut controller = LengthController::with_seed(0.0, 3).unwrap();
    controller.on_setup(&mut network).unwrap();
    frame(&mut world, &mut network, &mut controller);

    controller.on_teardown(&mut network).unwrap();
    network.teardown(&mut world).unwrap();

    assert_eq!(controller.state(), ControllerState::Uninitialized);
    assert!(controller.records().is_empty());
    assert_eq!(world.proxy_count(), 0);
}
