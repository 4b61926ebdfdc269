//! Tension-scaled contact impulses between a cable and the bodies it touches.
//!
//! Each step the resolver reads the backend's manifolds for the cable's
//! proxy and pushes every penetrating body away from the cable with
//!
//! ```text
//! J = m_eff · dt · (T / L) · |d| · n
//! ```
//!
//! where `m_eff` is the touched body's mass (0 for static bodies), `T` the
//! cable tension computed earlier in the same step, `L` the cable length,
//! `d` the penetration depth and `n` the contact normal pointing away from
//! the proxy. The cable's own anchor bodies never receive impulses.
//!
//! Manifolds are copied out of the backend and left untouched; the backend
//! still owns them for the rest of its pipeline.

use nalgebra::{Point3, Vector3};
use sim_contact::{
    CollisionBackend, CollisionObject, ContactManifold, OverlapPair, PhysicsBackend, ProxyId,
};
use sim_types::{BodyId, Result, SimError};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A penetrating contact point seen from the proxy's side.
///
/// Transient: built and consumed within one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    /// Pair the sample was taken from.
    pub pair: OverlapPair,
    /// Whether the proxy was object A of the manifold.
    pub proxy_is_a: bool,
    /// Object on the far side of the proxy.
    pub other: CollisionObject,
    /// Contact point in world coordinates.
    pub point: Point3<f64>,
    /// Unit normal pointing away from the proxy.
    pub normal: Vector3<f64>,
    /// Penetration depth, positive.
    pub depth: f64,
}

/// Outcome of one contact after resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedContact {
    /// The cable's proxy.
    pub proxy: ProxyId,
    /// The body that was touched.
    pub body: BodyId,
    /// Contact point in world coordinates.
    pub point: Point3<f64>,
    /// Unit normal pointing away from the proxy.
    pub normal: Vector3<f64>,
    /// Penetration depth, positive.
    pub depth: f64,
    /// Mass used to scale the impulse (0 for static bodies).
    pub effective_mass: f64,
    /// Impulse applied to the body.
    pub impulse: Vector3<f64>,
}

/// Scans a proxy's contact manifolds and applies impulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactImpulseResolver {
    proxy: ProxyId,
    excluded: [BodyId; 2],
}

impl ContactImpulseResolver {
    /// Create a resolver for `proxy` that ignores the two anchor bodies.
    #[must_use]
    pub const fn new(proxy: ProxyId, anchor_bodies: [BodyId; 2]) -> Self {
        Self {
            proxy,
            excluded: anchor_bodies,
        }
    }

    /// The proxy this resolver scans.
    #[must_use]
    pub const fn proxy(&self) -> ProxyId {
        self.proxy
    }

    /// Whether `body` is one of the cable's own anchor bodies.
    #[must_use]
    pub fn is_excluded(&self, body: BodyId) -> bool {
        body == self.excluded[0] || body == self.excluded[1]
    }

    /// Gather every penetrating contact point involving the proxy.
    ///
    /// Duplicate broad-phase pairs are merged so each contact point appears
    /// exactly once.
    pub fn collect<B: CollisionBackend + ?Sized>(&self, backend: &B) -> Vec<ContactSample> {
        let me = CollisionObject::Proxy(self.proxy);

        let mut pairs: Vec<OverlapPair> = backend
            .overlapping_pairs(self.proxy)
            .into_iter()
            .filter(|pair| pair.involves(me))
            .map(|pair| OverlapPair::new(pair.a, pair.b))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();

        let mut samples = Vec::new();
        for pair in &pairs {
            for manifold in backend.contact_manifolds(pair) {
                self.sample_manifold(pair, &manifold, &mut samples);
            }
        }
        samples
    }

    fn sample_manifold(
        &self,
        pair: &OverlapPair,
        manifold: &ContactManifold,
        samples: &mut Vec<ContactSample>,
    ) {
        // normal_on_b points toward A; flip it when the proxy is A so it
        // always points away from the proxy
        let (sign, other) = if manifold.object_a.is_proxy(self.proxy) {
            (-1.0, manifold.object_b)
        } else if manifold.object_b.is_proxy(self.proxy) {
            (1.0, manifold.object_a)
        } else {
            debug!(proxy = %self.proxy, ?pair, "manifold does not involve proxy");
            return;
        };

        samples.extend(
            manifold
                .points
                .iter()
                .filter(|pt| pt.is_penetrating())
                .map(|pt| ContactSample {
                    pair: *pair,
                    proxy_is_a: sign < 0.0,
                    other,
                    point: pt.position_on_b,
                    normal: pt.normal_on_b * sign,
                    depth: -pt.distance,
                }),
        );
    }

    /// Apply tension-scaled impulses for every penetrating contact.
    ///
    /// `tension` and `length` must come from the current step's force
    /// computation. Returns one record per contact with a movable or static
    /// rigid body that is not an anchor body.
    ///
    /// # Errors
    ///
    /// [`SimError::DegenerateGeometry`] for a non-positive `length`, or any
    /// error the backend reports while applying an impulse.
    pub fn resolve<B: PhysicsBackend + ?Sized>(
        &self,
        backend: &mut B,
        tension: f64,
        length: f64,
        dt: f64,
    ) -> Result<Vec<ResolvedContact>> {
        sim_types::check_timestep(dt)?;
        if length <= 0.0 {
            return Err(SimError::degenerate(length, f64::NAN));
        }

        let samples = self.collect(&*backend);
        let scale = dt * tension / length;
        let mut resolved = Vec::with_capacity(samples.len());

        for sample in samples {
            let Some(body) = sample.other.body() else {
                // proxy-proxy overlap, nothing to push
                continue;
            };
            if self.is_excluded(body) {
                continue;
            }
            let Some(inverse_mass) = backend.inverse_mass(body) else {
                warn!(proxy = %self.proxy, %body, "skipping contact with unknown body");
                continue;
            };

            let effective_mass = if inverse_mass == 0.0 {
                0.0
            } else {
                1.0 / inverse_mass
            };
            let impulse = sample.normal * (effective_mass * scale * sample.depth);

            if effective_mass > 0.0 {
                backend.apply_impulse(body, impulse, sample.point)?;
            }

            resolved.push(ResolvedContact {
                proxy: self.proxy,
                body,
                point: sample.point,
                normal: sample.normal,
                depth: sample.depth,
                effective_mass,
                impulse,
            });
        }

        if !resolved.is_empty() {
            debug!(proxy = %self.proxy, contacts = resolved.len(), tension, "resolved cable contacts");
        }
        Ok(resolved)
    }
}
