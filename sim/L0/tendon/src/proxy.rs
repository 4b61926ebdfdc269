//! Collision volume swept between a cable's anchors.

use nalgebra::Point3;
use sim_contact::{CollisionBackend, ProxyId, ProxyShape, ShapeKind};
use sim_types::{Pose, Result, SimError};
use tracing::debug;

/// Thin cylinder (or capsule) whose end caps follow the two anchors.
///
/// The shape kind is fixed at registration. Registration fails when the
/// backend cannot resize that kind, so the per-step update never has to
/// inspect the shape at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactCollisionProxy {
    id: ProxyId,
    shape: ProxyShape,
    pose: Pose,
}

impl ContactCollisionProxy {
    /// Register a proxy spanning `from` → `to`.
    ///
    /// # Errors
    ///
    /// - [`SimError::UnsupportedShape`] if the backend cannot update `kind`
    /// - [`SimError::InvalidArgument`] for a non-positive radius
    /// - [`SimError::DegenerateGeometry`] if the endpoints coincide
    pub fn register<B: CollisionBackend + ?Sized>(
        backend: &mut B,
        kind: ShapeKind,
        radius: f64,
        from: &Point3<f64>,
        to: &Point3<f64>,
    ) -> Result<Self> {
        if !backend.supports_shape_update(kind) {
            return Err(SimError::unsupported_shape(kind.to_string()));
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SimError::invalid_argument(format!(
                "proxy radius must be positive, got {radius}"
            )));
        }

        let (shape, pose) = Self::placement(kind, radius, from, to)?;
        let id = backend.register_proxy(shape, pose)?;
        debug!(proxy = %id, %kind, radius, "registered cable proxy");

        Ok(Self { id, shape, pose })
    }

    /// Move and resize the proxy to span `from` → `to`, re-registering it
    /// with the broad phase.
    pub fn track<B: CollisionBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        from: &Point3<f64>,
        to: &Point3<f64>,
    ) -> Result<()> {
        let (shape, pose) = Self::placement(self.shape.kind(), self.shape.radius(), from, to)?;
        backend.update_proxy(self.id, shape, pose)?;
        self.shape = shape;
        self.pose = pose;
        Ok(())
    }

    /// Remove the proxy from the backend.
    pub fn release<B: CollisionBackend + ?Sized>(self, backend: &mut B) -> Result<()> {
        debug!(proxy = %self.id, "releasing cable proxy");
        backend.remove_proxy(self.id)
    }

    /// Backend handle.
    #[must_use]
    pub const fn id(&self) -> ProxyId {
        self.id
    }

    /// Current shape.
    #[must_use]
    pub const fn shape(&self) -> ProxyShape {
        self.shape
    }

    /// Current world pose (local +Y along the cable).
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    fn placement(
        kind: ShapeKind,
        radius: f64,
        from: &Point3<f64>,
        to: &Point3<f64>,
    ) -> Result<(ProxyShape, Pose)> {
        let length = (to - from).norm();
        let pose = Pose::along_segment(from, to).ok_or(SimError::degenerate(length, 0.0))?;
        Ok((ProxyShape::new(kind, radius, length / 2.0), pose))
    }
}
