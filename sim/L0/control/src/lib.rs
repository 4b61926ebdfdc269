//! Controllers for tensegrity cable actuators.
//!
//! A controller is attached to a structure that exposes its actuators
//! through [`sim_tendon::ActuatedModel`] and is driven by three lifecycle
//! hooks:
//!
//! ```text
//! on_setup(model) ──► on_step(model, dt) ×N ──► on_teardown(model)
//! ```
//!
//! Controllers borrow the model per call and never keep references to its
//! actuators between calls.
//!
//! # Length Controller
//!
//! [`LengthController`] gives every actuator a random target rest length
//! around its start length, then waits for the structure to settle before
//! moving the motors:
//!
//! ```text
//!   Uninitialized ──on_setup──► Armed ──elapsed > 2 s──► Active
//!         ▲                                               │
//!         └───────────────────on_teardown─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use sim_control::{Controller, LengthController};
//!
//! let mut controller = LengthController::with_seed(0.0, 42)?;
//! controller.on_setup(&mut network)?;
//!
//! for _ in 0..1000 {
//!     world.detect_contacts();
//!     controller.on_step(&mut network, 0.01)?;
//!     network.step(0.01, &mut world)?;
//!     world.integrate(0.01)?;
//! }
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![doc(html_root_url = "https://docs.rs/sim-control/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

mod length;

pub use length::{
    ControlRecord, ControllerState, LengthController, LengthControllerConfig, TargetBand,
};

use sim_types::Result;

/// Lifecycle hooks a structure calls on its controller.
pub trait Controller<M: ?Sized> {
    /// Called once after the structure is built.
    fn on_setup(&mut self, model: &mut M) -> Result<()>;

    /// Called every simulation step, before the actuators are stepped.
    fn on_step(&mut self, model: &mut M, dt: f64) -> Result<()>;

    /// Called when the structure is torn down.
    fn on_teardown(&mut self, _model: &mut M) -> Result<()> {
        Ok(())
    }
}
