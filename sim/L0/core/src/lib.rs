//! Reference rigid-body and collision world for cable actuators.
//!
//! The cable core talks to its physics engine only through
//! [`sim_contact::PhysicsBackend`]. This crate provides the smallest engine
//! that satisfies it, for headless runs and tests:
//!
//! - **Bodies**: pose, scalar mass, linear velocity, force/torque/impulse
//!   accumulators, integrated by semi-implicit Euler
//! - **Obstacles**: sphere, box and plane shapes attached to bodies
//! - **Broad phase**: sweep-and-prune over AABBs ([`broad_phase`])
//! - **Narrow phase**: cable proxies as capsules against obstacle shapes
//!   ([`narrow_phase`])
//!
//! # Frame Loop
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────────┐   ┌───────────────┐
//! │ detect_contacts  │ → │ cables step (forces, │ → │ integrate(dt) │
//! │ pairs, manifolds │   │ contact impulses)    │   │ clear accums  │
//! └──────────────────┘   └──────────────────────┘   └───────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use sim_core::{CableWorld, ObstacleShape, WorldConfig};
//! use sim_types::{MassProperties, Pose};
//!
//! let mut world = CableWorld::new(WorldConfig::default());
//! let ball = world.add_obstacle(
//!     Pose::from_position(Point3::new(0.0, 0.0, 0.5)),
//!     MassProperties::new(1.0),
//!     ObstacleShape::sphere(0.5),
//! )?;
//!
//! for _ in 0..1000 {
//!     world.detect_contacts();
//!     network.step(0.001, &mut world)?;
//!     world.integrate(0.001)?;
//! }
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![doc(html_root_url = "https://docs.rs/sim-core/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::many_single_char_names,
    clippy::suboptimal_flops
)]

pub mod broad_phase;
pub mod narrow_phase;
pub mod world;

pub use broad_phase::{Aabb, Axis, SweepAndPrune};
pub use narrow_phase::{capsule_contacts, Capsule, ObstacleShape};
pub use world::{Body, CableWorld, WorldConfig};

// Re-export types used to populate a world
pub use sim_types::{BodyId, MassProperties, Pose};
