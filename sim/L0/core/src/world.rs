//! Reference world: rigid bodies, obstacles and cable proxies.
//!
//! [`CableWorld`] is the smallest engine that satisfies
//! [`PhysicsBackend`]. It keeps bodies with a pose, mass and linear
//! velocity, accumulates the forces and impulses cables write, and produces
//! contact manifolds between cable proxies and obstacle shapes.
//!
//! # Frame Loop
//!
//! ```text
//! detect_contacts() → cables step (read pairs, write forces) → integrate(dt)
//! ```
//!
//! Pairs and manifolds are computed for every proxy by
//! [`CableWorld::detect_contacts`]. Moving a proxy during the cable step
//! re-runs both phases for that proxy, so its pairs always match its
//! current geometry.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{Point3, Vector3};
use sim_contact::{
    CollisionBackend, CollisionObject, ContactManifold, OverlapPair, ProxyId, ProxyShape,
    RigidBodyBackend, ShapeKind,
};
use sim_types::{check_timestep, BodyId, MassProperties, Pose, Result, SimError};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::broad_phase::{Aabb, SweepAndPrune};
use crate::narrow_phase::{capsule_contacts, Capsule, ObstacleShape};

/// World-level settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// Gravitational acceleration applied to dynamic bodies.
    pub gravity: Vector3<f64>,
    /// Contact points are kept while their separation is below this.
    pub contact_margin: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, 0.0, -9.81),
            contact_margin: 0.01,
        }
    }
}

impl WorldConfig {
    /// Settings without gravity.
    #[must_use]
    pub fn zero_gravity() -> Self {
        Self {
            gravity: Vector3::zeros(),
            ..Self::default()
        }
    }

    /// Set the contact margin.
    #[must_use]
    pub fn with_contact_margin(mut self, margin: f64) -> Self {
        self.contact_margin = margin;
        self
    }
}

/// A rigid body in the reference world.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// Unique identifier.
    pub id: BodyId,
    /// Optional name for debugging.
    pub name: Option<String>,
    /// World pose.
    pub pose: Pose,
    /// Linear velocity.
    pub velocity: Vector3<f64>,
    /// Mass (infinite for static bodies).
    pub mass: MassProperties,
    /// Collision shape, if the body can touch cables.
    pub shape: Option<ObstacleShape>,
    /// Force accumulated since the last integration.
    pub accumulated_force: Vector3<f64>,
    /// Torque about the body origin accumulated since the last integration.
    pub accumulated_torque: Vector3<f64>,
    /// Impulse accumulated since the last integration.
    pub accumulated_impulse: Vector3<f64>,
}

impl Body {
    fn new(id: BodyId, pose: Pose, mass: MassProperties, shape: Option<ObstacleShape>) -> Self {
        Self {
            id,
            name: None,
            pose,
            velocity: Vector3::zeros(),
            mass,
            shape,
            accumulated_force: Vector3::zeros(),
            accumulated_torque: Vector3::zeros(),
            accumulated_impulse: Vector3::zeros(),
        }
    }

    /// Whether the body never moves.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass.is_static()
    }

    fn apply_force_at_point(&mut self, force: Vector3<f64>, point: Point3<f64>) {
        let r = point - self.pose.position;
        self.accumulated_force += force;
        self.accumulated_torque += r.cross(&force);
    }

    fn clear_accumulators(&mut self) {
        self.accumulated_force = Vector3::zeros();
        self.accumulated_torque = Vector3::zeros();
        self.accumulated_impulse = Vector3::zeros();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ProxyEntry {
    shape: ProxyShape,
    pose: Pose,
    aabb: Aabb,
}

impl ProxyEntry {
    fn new(shape: ProxyShape, pose: Pose) -> Self {
        Self {
            shape,
            pose,
            aabb: Aabb::from_proxy(&shape, &pose),
        }
    }

    fn capsule(&self) -> Capsule {
        Capsule::from_pose(&self.pose, self.shape.half_height(), self.shape.radius())
    }
}

/// Reference rigid-body and collision world for cables.
#[derive(Debug, Clone)]
pub struct CableWorld {
    config: WorldConfig,
    bodies: BTreeMap<BodyId, Body>,
    proxies: BTreeMap<ProxyId, ProxyEntry>,
    next_body_id: u64,
    next_proxy_id: u64,
    frozen_kinds: BTreeSet<ShapeKind>,
    broad_phase: SweepAndPrune,
    pairs: Vec<OverlapPair>,
    manifolds: BTreeMap<OverlapPair, ContactManifold>,
    time: f64,
}

impl Default for CableWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl CableWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: BTreeMap::new(),
            proxies: BTreeMap::new(),
            next_body_id: 1,
            next_proxy_id: 1,
            frozen_kinds: BTreeSet::new(),
            broad_phase: SweepAndPrune::new().with_margin(config.contact_margin * 0.5),
            pairs: Vec::new(),
            manifolds: BTreeMap::new(),
            time: 0.0,
        }
    }

    /// World settings.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Simulated time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Add a body without collision geometry.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] for an invalid mass or non-finite pose.
    pub fn add_body(&mut self, pose: Pose, mass: MassProperties) -> Result<BodyId> {
        self.insert_body(pose, mass, None)
    }

    /// Add an immovable body without collision geometry.
    pub fn add_static_body(&mut self, pose: Pose) -> Result<BodyId> {
        self.insert_body(pose, MassProperties::fixed(), None)
    }

    /// Add a body with a collision shape.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] for an invalid mass, shape or pose.
    pub fn add_obstacle(
        &mut self,
        pose: Pose,
        mass: MassProperties,
        shape: ObstacleShape,
    ) -> Result<BodyId> {
        if !shape.is_valid() {
            return Err(SimError::invalid_argument(format!(
                "invalid obstacle shape {shape:?}"
            )));
        }
        self.insert_body(pose, mass, Some(shape))
    }

    fn insert_body(
        &mut self,
        pose: Pose,
        mass: MassProperties,
        shape: Option<ObstacleShape>,
    ) -> Result<BodyId> {
        mass.validate()?;
        if !pose.is_finite() {
            return Err(SimError::invalid_argument("body pose must be finite"));
        }

        let id = BodyId::new(self.next_body_id);
        self.next_body_id += 1;
        self.bodies.insert(id, Body::new(id, pose, mass, shape));
        debug!(body = %id, mass = mass.mass, "added body");
        Ok(id)
    }

    /// Name a body for debugging.
    pub fn set_body_name(&mut self, id: BodyId, name: impl Into<String>) -> Result<()> {
        let body = self.body_mut(id)?;
        body.name = Some(name.into());
        Ok(())
    }

    /// Get a body by ID.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        self.bodies
            .get_mut(&id)
            .ok_or(SimError::InvalidBodyId(id.raw()))
    }

    /// Iterate over all bodies in ID order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    /// Number of bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Teleport a body.
    pub fn set_pose(&mut self, id: BodyId, pose: Pose) -> Result<()> {
        self.body_mut(id)?.pose = pose;
        Ok(())
    }

    /// Set a body's linear velocity.
    pub fn set_velocity(&mut self, id: BodyId, velocity: Vector3<f64>) -> Result<()> {
        self.body_mut(id)?.velocity = velocity;
        Ok(())
    }

    /// Refuse (or allow again) run-time resizing for all proxy kinds.
    pub fn set_shape_updates_supported(&mut self, supported: bool) {
        if supported {
            self.frozen_kinds.clear();
        } else {
            self.frozen_kinds.extend([ShapeKind::Cylinder, ShapeKind::Capsule]);
        }
    }

    /// Refuse run-time resizing for one proxy kind.
    pub fn freeze_shape_kind(&mut self, kind: ShapeKind) {
        self.frozen_kinds.insert(kind);
    }

    /// Number of registered proxies.
    #[must_use]
    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Current shape and pose of a proxy.
    #[must_use]
    pub fn proxy(&self, id: ProxyId) -> Option<(ProxyShape, Pose)> {
        self.proxies.get(&id).map(|entry| (entry.shape, entry.pose))
    }

    /// All pairs found by the last detection pass.
    #[must_use]
    pub fn pairs(&self) -> &[OverlapPair] {
        &self.pairs
    }

    /// Run broad and narrow phase for every proxy.
    pub fn detect_contacts(&mut self) {
        let mut entries: Vec<(CollisionObject, Aabb)> =
            Vec::with_capacity(self.bodies.len() + self.proxies.len());
        let mut planes = Vec::new();

        for body in self.bodies.values() {
            let Some(shape) = body.shape else { continue };
            match shape.aabb(&body.pose) {
                Some(aabb) => entries.push((CollisionObject::Body(body.id), aabb)),
                None => planes.push(body.id),
            }
        }
        for (id, entry) in &self.proxies {
            entries.push((CollisionObject::Proxy(*id), entry.aabb));
        }

        let margin = self.config.contact_margin;
        let mut candidates = self.broad_phase.find_pairs(&entries);

        // Planes are unbounded: test against every proxy
        for plane in &planes {
            for proxy in self.proxies.keys() {
                candidates.push(OverlapPair::new(
                    CollisionObject::Body(*plane),
                    CollisionObject::Proxy(*proxy),
                ));
            }
        }
        candidates.sort_unstable();

        self.pairs.clear();
        self.manifolds.clear();
        for pair in candidates {
            let Some(manifold) = self.narrow_phase(&pair, margin) else {
                continue;
            };
            self.pairs.push(pair);
            self.manifolds.insert(pair, manifold);
        }

        trace!(pairs = self.pairs.len(), "contact detection");
    }

    fn narrow_phase(&self, pair: &OverlapPair, margin: f64) -> Option<ContactManifold> {
        let (proxy_id, body_id) = match (pair.a, pair.b) {
            (CollisionObject::Body(body), CollisionObject::Proxy(proxy))
            | (CollisionObject::Proxy(proxy), CollisionObject::Body(body)) => (proxy, body),
            _ => return None,
        };
        let proxy = self.proxies.get(&proxy_id)?;
        let body = self.bodies.get(&body_id)?;
        let shape = body.shape.as_ref()?;

        let points = capsule_contacts(&proxy.capsule(), shape, &body.pose, margin);
        if points.is_empty() {
            return None;
        }
        let mut manifold =
            ContactManifold::new(CollisionObject::Proxy(proxy_id), CollisionObject::Body(body_id));
        manifold.points = points;
        Some(manifold)
    }

    /// Drop the proxy's cached pairs and re-run both phases for it alone.
    fn refresh_proxy_pairs(&mut self, proxy: ProxyId) {
        let object = CollisionObject::Proxy(proxy);
        self.pairs.retain(|pair| !pair.involves(object));
        self.manifolds.retain(|pair, _| !pair.involves(object));

        let Some(entry) = self.proxies.get(&proxy) else {
            return;
        };
        let margin = self.config.contact_margin;
        let bounds = entry.aabb.expanded(margin * 0.5);

        let found: Vec<(OverlapPair, ContactManifold)> = self
            .bodies
            .values()
            .filter(|body| match body.shape.and_then(|shape| shape.aabb(&body.pose)) {
                Some(aabb) => aabb.expanded(margin * 0.5).overlaps(&bounds),
                // Planes have no bounds
                None => body.shape.is_some(),
            })
            .filter_map(|body| {
                let pair = OverlapPair::new(CollisionObject::Body(body.id), object);
                self.narrow_phase(&pair, margin).map(|manifold| (pair, manifold))
            })
            .collect();

        for (pair, manifold) in found {
            self.pairs.push(pair);
            self.manifolds.insert(pair, manifold);
        }
        self.pairs.sort_unstable();
        trace!(%proxy, pairs = self.pairs.len(), "proxy pairs refreshed");
    }

    /// Advance dynamic bodies by semi-implicit Euler and clear accumulators.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidTimestep`] if `dt <= 0`.
    pub fn integrate(&mut self, dt: f64) -> Result<()> {
        check_timestep(dt)?;
        let gravity = self.config.gravity;

        for body in self.bodies.values_mut() {
            if !body.is_static() {
                let inv_mass = body.mass.inverse_mass();
                body.velocity += body.accumulated_impulse * inv_mass;
                body.velocity += (body.accumulated_force * inv_mass + gravity) * dt;
                body.pose.position += body.velocity * dt;
            }
            body.clear_accumulators();
        }

        self.time += dt;
        Ok(())
    }
}

impl RigidBodyBackend for CableWorld {
    fn pose(&self, body: BodyId) -> Option<Pose> {
        self.bodies.get(&body).map(|b| b.pose)
    }

    fn inverse_mass(&self, body: BodyId) -> Option<f64> {
        self.bodies.get(&body).map(|b| b.mass.inverse_mass())
    }

    fn apply_force_at_point(
        &mut self,
        body: BodyId,
        force: Vector3<f64>,
        point: Point3<f64>,
    ) -> Result<()> {
        self.body_mut(body)?.apply_force_at_point(force, point);
        Ok(())
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vector3<f64>, _point: Point3<f64>) -> Result<()> {
        // Linear only; this world has no angular state
        self.body_mut(body)?.accumulated_impulse += impulse;
        Ok(())
    }
}

impl CollisionBackend for CableWorld {
    fn supports_shape_update(&self, kind: ShapeKind) -> bool {
        !self.frozen_kinds.contains(&kind)
    }

    fn register_proxy(&mut self, shape: ProxyShape, pose: Pose) -> Result<ProxyId> {
        let id = ProxyId::new(self.next_proxy_id);
        self.next_proxy_id += 1;
        self.proxies.insert(id, ProxyEntry::new(shape, pose));
        Ok(id)
    }

    fn update_proxy(&mut self, proxy: ProxyId, shape: ProxyShape, pose: Pose) -> Result<()> {
        if !self.supports_shape_update(shape.kind()) {
            return Err(SimError::unsupported_shape(shape.kind().to_string()));
        }
        let entry = self
            .proxies
            .get_mut(&proxy)
            .ok_or(SimError::InvalidProxyId(proxy.raw()))?;
        *entry = ProxyEntry::new(shape, pose);
        self.refresh_proxy_pairs(proxy);
        Ok(())
    }

    fn remove_proxy(&mut self, proxy: ProxyId) -> Result<()> {
        self.proxies
            .remove(&proxy)
            .ok_or(SimError::InvalidProxyId(proxy.raw()))?;
        let gone = CollisionObject::Proxy(proxy);
        self.pairs.retain(|pair| !pair.involves(gone));
        self.manifolds.retain(|pair, _| !pair.involves(gone));
        Ok(())
    }

    fn overlapping_pairs(&self, proxy: ProxyId) -> Vec<OverlapPair> {
        let object = CollisionObject::Proxy(proxy);
        self.pairs
            .iter()
            .filter(|pair| pair.involves(object))
            .copied()
            .collect()
    }

    fn contact_manifolds(&self, pair: &OverlapPair) -> Vec<ContactManifold> {
        self.manifolds
            .get(&OverlapPair::new(pair.a, pair.b))
            .cloned()
            .into_iter()
            .collect()
    }
}
