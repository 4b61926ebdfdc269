//! Traits describing what the cable core needs from a rigid-body engine.
//!
//! The cable crates never integrate motion or detect collisions themselves.
//! An engine plugs in by implementing [`RigidBodyBackend`] and
//! [`CollisionBackend`]; anything implementing both is a [`PhysicsBackend`].
//!
//! All writes take `&mut self` and must accumulate: several cables may push
//! on the same body within one step.

use nalgebra::{Point3, Vector3};
use sim_types::{BodyId, Pose};

use crate::{ContactManifold, OverlapPair, ProxyId, ProxyShape, ShapeKind};

/// Rigid-body queries and force/impulse accumulation.
pub trait RigidBodyBackend {
    /// World pose of a body, `None` if the body is unknown.
    fn pose(&self, body: BodyId) -> Option<Pose>;

    /// Inverse mass of a body (0 for static bodies), `None` if unknown.
    fn inverse_mass(&self, body: BodyId) -> Option<f64>;

    /// Add a force acting at a world-space point to the body's accumulator.
    fn apply_force_at_point(
        &mut self,
        body: BodyId,
        force: Vector3<f64>,
        point: Point3<f64>,
    ) -> sim_types::Result<()>;

    /// Add an impulse acting at a world-space point.
    fn apply_impulse(
        &mut self,
        body: BodyId,
        impulse: Vector3<f64>,
        point: Point3<f64>,
    ) -> sim_types::Result<()>;
}

/// Collision proxy management plus broad- and narrow-phase queries.
pub trait CollisionBackend {
    /// Whether proxies of this kind can be resized and moved after creation.
    fn supports_shape_update(&self, kind: ShapeKind) -> bool;

    /// Register a new proxy with the broad phase.
    fn register_proxy(&mut self, shape: ProxyShape, pose: Pose) -> sim_types::Result<ProxyId>;

    /// Resize and move a proxy, then re-register it so no stale pairs remain.
    fn update_proxy(
        &mut self,
        proxy: ProxyId,
        shape: ProxyShape,
        pose: Pose,
    ) -> sim_types::Result<()>;

    /// Remove a proxy from the broad phase.
    fn remove_proxy(&mut self, proxy: ProxyId) -> sim_types::Result<()>;

    /// Broad-phase pairs involving the proxy.
    fn overlapping_pairs(&self, proxy: ProxyId) -> Vec<OverlapPair>;

    /// Narrow-phase manifolds for a pair. Returned by value; the backend
    /// keeps its own copy for the rest of its pipeline.
    fn contact_manifolds(&self, pair: &OverlapPair) -> Vec<ContactManifold>;
}

/// A complete backend.
pub trait PhysicsBackend: RigidBodyBackend + CollisionBackend {}

impl<T: RigidBodyBackend + CollisionBackend + ?Sized> PhysicsBackend for T {}
