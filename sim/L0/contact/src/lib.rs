//! Contact types and physics backend seam for cable simulation.
//!
//! Cable actuators interact with their surroundings through a collision
//! proxy: a thin cylinder (or capsule) swept between the two anchors. This
//! crate defines the data that flows across the boundary to the external
//! rigid-body engine:
//!
//! - **Proxy shapes**: [`ProxyShape`], a tagged variant fixed at registration
//! - **Broad phase**: [`OverlapPair`] between two [`CollisionObject`]s
//! - **Narrow phase**: [`ContactManifold`] of [`ContactPoint`]s
//! - **Backend traits**: [`RigidBodyBackend`], [`CollisionBackend`],
//!   [`PhysicsBackend`]
//!
//! # Sign Convention
//!
//! Manifolds use Bullet's convention:
//!
//! ```text
//!        A
//!        ↑  normal_on_b (from B toward A)
//!   ─────●───── surface of B
//!        B
//! ```
//!
//! `distance < 0` means the shapes overlap by `|distance|`.
//!
//! # Example
//!
//! ```
//! use sim_contact::{CollisionObject, ContactManifold, ContactPoint, ProxyId};
//! use sim_types::BodyId;
//! use nalgebra::{Point3, Vector3};
//!
//! let manifold = ContactManifold::new(
//!     CollisionObject::Proxy(ProxyId::new(0)),
//!     CollisionObject::Body(BodyId::new(7)),
//! )
//! .with_point(ContactPoint::new(Point3::origin(), Vector3::z(), -0.002));
//!
//! assert!(manifold.points[0].is_penetrating());
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![doc(html_root_url = "https://docs.rs/sim-contact/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn, clippy::missing_errors_doc)]

mod backend;
mod contact;
mod shape;

pub use backend::{CollisionBackend, PhysicsBackend, RigidBodyBackend};
pub use contact::{CollisionObject, ContactManifold, ContactPoint, OverlapPair, ProxyId};
pub use shape::{ProxyShape, ShapeKind};

// Re-export types needed by backend implementors
pub use sim_types::{BodyId, Pose};
