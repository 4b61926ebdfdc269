//! Core types for tensegrity cable simulation.
//!
//! This crate provides the vocabulary shared by every cable crate:
//!
//! - [`BodyId`] - Handle to a rigid body owned by the physics backend
//! - [`Pose`] - Position and orientation of a rigid body
//! - [`MassProperties`] - Scalar mass of a rigid body
//! - [`SimError`] - The single error type for build and step operations
//!
//! # Design Philosophy
//!
//! These types are **pure data**. Rigid bodies live in an external engine;
//! cables only hold handles to them and read their state each step.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use sim_types::{check_timestep, Pose, SimError};
//! use nalgebra::Point3;
//!
//! let pose = Pose::from_position(Point3::new(0.0, 0.0, 1.0));
//! assert_eq!(pose.position.z, 1.0);
//!
//! assert_eq!(check_timestep(0.0), Err(SimError::InvalidTimestep(0.0)));
//! ```

#![doc(html_root_url = "https://docs.rs/sim-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::missing_errors_doc,
)]

mod body;
mod error;

pub use body::{BodyId, MassProperties, Pose};
pub use error::{check_timestep, SimError};

pub use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
