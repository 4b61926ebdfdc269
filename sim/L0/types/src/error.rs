//! Error types for cable simulation operations.

use thiserror::Error;

/// Errors that can occur while building or stepping cable actuators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A configured value or command argument is out of range.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the offending value.
        reason: String,
    },

    /// Invalid timestep.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Cable axis is undefined (zero length or non-positive rest length).
    #[error("degenerate cable geometry: length {length}, rest length {rest_length}")]
    DegenerateGeometry {
        /// Current anchor-to-anchor length.
        length: f64,
        /// Current rest length.
        rest_length: f64,
    },

    /// The backend cannot mutate the requested collision shape.
    #[error("backend does not support shape updates for {kind}")]
    UnsupportedShape {
        /// Name of the shape kind.
        kind: String,
    },

    /// Invalid body ID referenced.
    #[error("invalid body ID: {0}")]
    InvalidBodyId(u64),

    /// Invalid collision proxy ID referenced.
    #[error("invalid proxy ID: {0}")]
    InvalidProxyId(u64),
}

impl SimError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an unsupported shape error.
    #[must_use]
    pub fn unsupported_shape(kind: impl Into<String>) -> Self {
        Self::UnsupportedShape { kind: kind.into() }
    }

    /// Create a degenerate geometry error.
    #[must_use]
    pub const fn degenerate(length: f64, rest_length: f64) -> Self {
        Self::DegenerateGeometry {
            length,
            rest_length,
        }
    }

    /// Check if this is a setup-time configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::UnsupportedShape { .. }
        )
    }

    /// Check if this error came from a non-positive timestep.
    #[must_use]
    pub fn is_timestep_error(&self) -> bool {
        matches!(self, Self::InvalidTimestep(_))
    }
}

/// Validate a stepping timestep.
pub fn check_timestep(dt: f64) -> crate::Result<()> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidTimestep(dt))
    }
}
