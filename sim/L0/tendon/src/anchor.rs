//! Cable attachment points on rigid bodies.

use nalgebra::Point3;
use sim_contact::RigidBodyBackend;
use sim_types::{BodyId, Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point fixed on a rigid body where a cable attaches.
///
/// The offset is stored in the body's local frame, so the anchor follows the
/// body as it moves. The body itself is owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anchor {
    body: BodyId,
    local_offset: Point3<f64>,
}

impl Anchor {
    /// Create an anchor from a body-local offset.
    #[must_use]
    pub const fn new(body: BodyId, local_offset: Point3<f64>) -> Self {
        Self { body, local_offset }
    }

    /// Create an anchor at the body origin.
    #[must_use]
    pub fn at_origin(body: BodyId) -> Self {
        Self::new(body, Point3::origin())
    }

    /// Create an anchor from a world-space point, using the body's current pose.
    pub fn from_world<B: RigidBodyBackend + ?Sized>(
        body: BodyId,
        world_point: &Point3<f64>,
        backend: &B,
    ) -> Result<Self> {
        let pose = backend
            .pose(body)
            .ok_or(SimError::InvalidBodyId(body.raw()))?;
        Ok(Self::new(body, pose.inverse_transform_point(world_point)))
    }

    /// The body this anchor is attached to.
    #[must_use]
    pub const fn body(&self) -> BodyId {
        self.body
    }

    /// Offset in the body's local frame.
    #[must_use]
    pub const fn local_offset(&self) -> Point3<f64> {
        self.local_offset
    }

    /// Current world position of the anchor.
    pub fn world_position<B: RigidBodyBackend + ?Sized>(&self, backend: &B) -> Result<Point3<f64>> {
        backend
            .pose(self.body)
            .map(|pose| pose.transform_point(&self.local_offset))
            .ok_or(SimError::InvalidBodyId(self.body.raw()))
    }
}
