//! Tensioned cable actuators with contact-aware force coupling.
//!
//! This crate models the cables of tensegrity robots: elastic members
//! stretched between two rigid bodies whose rest length is driven by a
//! controller, and which push obstacles aside when they are dragged across
//! them.
//!
//! # Cable Actuator
//!
//! ```text
//!     Body A                               Body B
//!       ●═══════════════════════════════════●
//!    anchor 1   ← T·û          −T·û →    anchor 2
//!              ╰──── collision proxy ────╯
//! ```
//!
//! A [`CableActuator`] composes:
//!
//! - [`CableForceModel`]: one-way spring-damper tension from the anchor
//!   geometry (see [`cable`])
//! - [`ContactCollisionProxy`]: a thin cylinder re-fitted between the
//!   anchors every step
//! - [`ContactImpulseResolver`]: tension-scaled impulses on bodies that
//!   penetrate the proxy, skipping the cable's own anchor bodies
//!
//! # Physics Backend
//!
//! Rigid bodies, broad phase and narrow phase belong to an external engine
//! reached through [`sim_contact::PhysicsBackend`]. Cables only read poses and
//! masses and accumulate forces and impulses.
//!
//! # Quick Start
//!
//! ```ignore
//! use sim_tendon::{Anchor, CableActuator, CableConfig};
//!
//! let mut cable = CableActuator::new(
//!     CableConfig::new(1000.0, 10.0),
//!     Anchor::at_origin(strut_a),
//!     Anchor::at_origin(strut_b),
//!     &mut world,
//! )?;
//!
//! cable.set_target_length(0.8 * cable.start_length())?;
//! for _ in 0..100 {
//!     cable.move_motors(0.01)?;
//!     cable.step(0.01, &mut world)?;
//! }
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//!
//! - Headless training loops for reinforcement learning
//! - Hardware control systems
//! - Integration with other physics engines

#![doc(html_root_url = "https://docs.rs/sim-tendon/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::doc_markdown,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::suboptimal_flops,
    clippy::float_cmp
)]
#![cfg_attr(test, allow(clippy::let_underscore_must_use))]

pub mod actuator;
pub mod anchor;
pub mod cable;
pub mod network;
pub mod proxy;
pub mod resolver;

// Re-export main types at crate root
pub use actuator::{CableActuator, CableHistory};
pub use anchor::Anchor;
pub use cable::{CableConfig, CableForce, CableForceModel};
pub use network::CableNetwork;
pub use proxy::ContactCollisionProxy;
pub use resolver::{ContactImpulseResolver, ContactSample, ResolvedContact};

/// An actuator whose rest length is commanded by a controller.
///
/// Controllers only see this interface, so they can drive cables from any
/// backend, or test doubles.
pub trait LengthActuator {
    /// Anchor-to-anchor length when the actuator was built.
    fn start_length(&self) -> f64;

    /// Current rest length.
    fn rest_length(&self) -> f64;

    /// Anchor-to-anchor length measured on the last step.
    fn actual_length(&self) -> f64;

    /// Tension produced on the last step (never negative).
    fn tension(&self) -> f64;

    /// Command a new target rest length.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidArgument` if `length < 0`.
    fn set_target_length(&mut self, length: f64) -> sim_types::Result<()>;

    /// Move the rest length toward the target, bounded by the actuator's
    /// slew rate.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidTimestep` if `dt <= 0`.
    fn move_motors(&mut self, dt: f64) -> sim_types::Result<()>;
}

/// A structure exposing its actuator collection to controllers.
pub trait ActuatedModel {
    /// Actuator type.
    type Actuator: LengthActuator;

    /// All actuators, in a stable order.
    fn actuators(&self) -> &[Self::Actuator];

    /// All actuators, mutably, in the same order.
    fn actuators_mut(&mut self) -> &mut [Self::Actuator];
}
