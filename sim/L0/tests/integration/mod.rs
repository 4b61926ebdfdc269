//! Integration tests for the cable actuator stack.
//!
//! Each scenario runs the full frame loop against the reference world:
//!
//! ```text
//! world.detect_contacts() → controller.on_step() → network.step() → world.integrate()
//! ```
//!
//! - Contact impulses on free, static and anchor bodies
//! - Network stepping order and force accumulation
//! - Randomised length controller driving real cables

pub mod common;
pub mod contact_scenarios;
pub mod controller_pipeline;
pub mod network_stepping;
