//! Contact geometry reported by the narrow phase.
//!
//! Manifolds follow the Bullet convention: `normal_on_b` is expressed on
//! object B and points from B toward A, and a negative `distance` means the
//! two shapes overlap.

use nalgebra::{Point3, Vector3};
use sim_types::BodyId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to a collision proxy registered with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProxyId(pub u64);

impl ProxyId {
    /// Create a new proxy ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProxyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Proxy({})", self.0)
    }
}

/// One side of a collision pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionObject {
    /// A rigid body that can receive impulses.
    Body(BodyId),
    /// A non-dynamic collision proxy (e.g. a cable's swept volume).
    Proxy(ProxyId),
}

impl CollisionObject {
    /// The rigid body behind this object, if any.
    #[must_use]
    pub const fn body(self) -> Option<BodyId> {
        match self {
            Self::Body(id) => Some(id),
            Self::Proxy(_) => None,
        }
    }

    /// Whether this object is the given proxy.
    #[must_use]
    pub fn is_proxy(self, proxy: ProxyId) -> bool {
        self == Self::Proxy(proxy)
    }
}

/// A broad-phase overlap pair.
///
/// Pairs are unordered; [`OverlapPair::new`] normalises the order so the
/// same two objects always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlapPair {
    /// First object (smaller in `Ord`).
    pub a: CollisionObject,
    /// Second object.
    pub b: CollisionObject,
}

impl OverlapPair {
    /// Create a normalised pair.
    #[must_use]
    pub fn new(a: CollisionObject, b: CollisionObject) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Whether either side is the given object.
    #[must_use]
    pub fn involves(&self, object: CollisionObject) -> bool {
        self.a == object || self.b == object
    }

    /// The side opposite `object`, if `object` is part of this pair.
    #[must_use]
    pub fn other(&self, object: CollisionObject) -> Option<CollisionObject> {
        if self.a == object {
            Some(self.b)
        } else if self.b == object {
            Some(self.a)
        } else {
            None
        }
    }
}

/// A single contact point within a manifold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPoint {
    /// Contact location on object B, world frame.
    pub position_on_b: Point3<f64>,
    /// Contact normal on B, pointing from B toward A (unit length).
    pub normal_on_b: Vector3<f64>,
    /// Signed separation; negative when overlapping.
    pub distance: f64,
}

impl ContactPoint {
    /// Create a new contact point.
    #[must_use]
    pub fn new(position_on_b: Point3<f64>, normal_on_b: Vector3<f64>, distance: f64) -> Self {
        Self {
            position_on_b,
            normal_on_b,
            distance,
        }
    }

    /// Whether the shapes actually overlap at this point.
    #[must_use]
    pub fn is_penetrating(&self) -> bool {
        self.distance < 0.0
    }
}

/// Contact points between two collision objects for one step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactManifold {
    /// Object A.
    pub object_a: CollisionObject,
    /// Object B.
    pub object_b: CollisionObject,
    /// Contact points (Bullet keeps at most four).
    pub points: Vec<ContactPoint>,
}

impl ContactManifold {
    /// Create an empty manifold.
    #[must_use]
    pub fn new(object_a: CollisionObject, object_b: CollisionObject) -> Self {
        Self {
            object_a,
            object_b,
            points: Vec::new(),
        }
    }

    /// Add a contact point.
    #[must_use]
    pub fn with_point(mut self, point: ContactPoint) -> Self {
        self.points.push(point);
        self
    }

    /// The pair this manifold belongs to.
    #[must_use]
    pub fn pair(&self) -> OverlapPair {
        OverlapPair::new(self.object_a, self.object_b)
    }

    /// Number of contact points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the manifold holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_normalised() {
        let body = CollisionObject::Body(BodyId::new(3));
        let proxy = CollisionObject::Proxy(ProxyId::new(1));

        assert_eq!(OverlapPair::new(body, proxy), OverlapPair::new(proxy, body));
        let pair = OverlapPair::new(proxy, body);
        assert_eq!(pair.other(proxy), Some(body));
        assert_eq!(pair.other(body), Some(proxy));
        assert_eq!(pair.other(CollisionObject::Body(BodyId::new(9))), None);
    }

    #[test]
    fn test_collision_object_body() {
        assert_eq!(
            CollisionObject::Body(BodyId::new(2)).body(),
            Some(BodyId::new(2))
        );
        assert_eq!(CollisionObject::Proxy(ProxyId::new(2)).body(), None);
        assert!(CollisionObject::Proxy(ProxyId::new(2)).is_proxy(ProxyId::new(2)));
    }

    #[test]
    fn test_manifold_points() {
        let manifold = ContactManifold::new(
            CollisionObject::Proxy(ProxyId::new(0)),
            CollisionObject::Body(BodyId::new(1)),
        )
        .with_point(ContactPoint::new(Point3::origin(), Vector3::z(), -0.01))
        .with_point(ContactPoint::new(Point3::origin(), Vector3::z(), 0.02));

        assert_eq!(manifold.len(), 2);
        assert!(manifold.points[0].is_penetrating());
        assert!(!manifold.points[1].is_penetrating());
    }
}
