//! Collision proxy shapes.
//!
//! A proxy's shape kind is fixed when it is registered; only its dimensions
//! change afterwards. Both kinds are aligned with the local Y axis.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape kind tag, used to ask a backend what it can mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    /// Flat-capped cylinder.
    #[default]
    Cylinder,
    /// Hemisphere-capped capsule.
    Capsule,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cylinder => write!(f, "cylinder"),
            Self::Capsule => write!(f, "capsule"),
        }
    }
}

/// Proxy shape with its dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProxyShape {
    /// Cylinder along local Y.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Half of the axial length.
        half_height: f64,
    },
    /// Capsule along local Y; `half_height` excludes the end caps.
    Capsule {
        /// Radius.
        radius: f64,
        /// Half of the segment length.
        half_height: f64,
    },
}

impl ProxyShape {
    /// Build a shape of the given kind.
    #[must_use]
    pub const fn new(kind: ShapeKind, radius: f64, half_height: f64) -> Self {
        match kind {
            ShapeKind::Cylinder => Self::Cylinder {
                radius,
                half_height,
            },
            ShapeKind::Capsule => Self::Capsule {
                radius,
                half_height,
            },
        }
    }

    /// The kind tag of this shape.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Capsule { .. } => ShapeKind::Capsule,
        }
    }

    /// Radius of the shape.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        match *self {
            Self::Cylinder { radius, .. } | Self::Capsule { radius, .. } => radius,
        }
    }

    /// Half of the axial length.
    #[must_use]
    pub const fn half_height(&self) -> f64 {
        match *self {
            Self::Cylinder { half_height, .. } | Self::Capsule { half_height, .. } => half_height,
        }
    }

    /// Same kind and radius, new half height.
    #[must_use]
    pub const fn resized(&self, half_height: f64) -> Self {
        Self::new(self.kind(), self.radius(), half_height)
    }

    /// Radius of a sphere enclosing the shape.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        match *self {
            Self::Cylinder {
                radius,
                half_height,
            } => radius.hypot(half_height),
            Self::Capsule {
                radius,
                half_height,
            } => radius + half_height,
        }
    }
}
