//! Cable configuration and the spring-damper force model.
//!
//! # Cable Model
//!
//! Cables are one-way springs that can only pull, not push:
//!
//! ```text
//! T = {
//!     clamp(k(L - L₀) + c·v, 0, T_max)    if L > L₀ (stretched)
//!     0                                   if L ≤ L₀ (slack)
//! }
//! ```
//!
//! Where:
//! - `k` is the stiffness (N/m)
//! - `L` is the anchor-to-anchor length
//! - `L₀` is the rest length
//! - `c` is the damping coefficient
//! - `v` is the elongation velocity `(L - L_prev) / dt`
//!
//! The damping term is limited to the magnitude of the spring term, so a
//! fast-shortening cable goes slack instead of producing a large negative
//! spike that the clamp would hide.
//!
//! The force on the first anchor is `T·û` with `û = (p₂ - p₁)/L`; the
//! second anchor receives `-T·û`.

use nalgebra::{Point3, Vector3};
use sim_contact::ShapeKind;
use sim_types::{Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lengths shorter than this have no usable axis direction.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Default collision proxy radius, in length units.
pub const DEFAULT_PROXY_RADIUS: f64 = 0.01;

/// Mechanical and actuation parameters of a cable actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CableConfig {
    /// Stiffness (spring constant) in N/m.
    pub stiffness: f64,

    /// Damping coefficient in N·s/m.
    pub damping: f64,

    /// Tension at construction, in Newtons.
    ///
    /// The initial rest length is `start_length - pretension / stiffness`.
    pub pretension: f64,

    /// Maximum tension, in Newtons. `f64::INFINITY` disables the limit.
    pub max_tension: f64,

    /// Rest-length slew rate used by `move_motors`, in m/s.
    pub target_velocity: f64,

    /// The motor refuses to shorten the cable once the measured length is
    /// at or below this value.
    pub min_actual_length: f64,

    /// Lower bound on the rest length reachable by the motor.
    pub min_rest_length: f64,

    /// Radius of the contact proxy.
    pub proxy_radius: f64,

    /// Shape of the contact proxy.
    pub proxy_kind: ShapeKind,

    /// Record per-step length, rest length and tension.
    pub record_history: bool,
}

impl Default for CableConfig {
    fn default() -> Self {
        Self {
            stiffness: 1000.0,
            damping: 10.0,
            pretension: 0.0,
            max_tension: f64::INFINITY,
            target_velocity: 1.0,
            min_actual_length: 0.1,
            min_rest_length: 0.1,
            proxy_radius: DEFAULT_PROXY_RADIUS,
            proxy_kind: ShapeKind::Cylinder,
            record_history: false,
        }
    }
}

impl CableConfig {
    /// Create a config with the given stiffness and damping.
    #[must_use]
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            ..Self::default()
        }
    }

    /// Stiff, lightly damped elastic cable typical of tensegrity prototypes.
    #[must_use]
    pub fn tensegrity_default() -> Self {
        Self {
            stiffness: 5000.0,
            damping: 50.0,
            pretension: 100.0,
            max_tension: 2000.0,
            target_velocity: 0.5,
            ..Self::default()
        }
    }

    /// Set the pretension.
    #[must_use]
    pub fn with_pretension(mut self, pretension: f64) -> Self {
        self.pretension = pretension;
        self
    }

    /// Set the maximum tension.
    #[must_use]
    pub fn with_max_tension(mut self, max_tension: f64) -> Self {
        self.max_tension = max_tension;
        self
    }

    /// Set the motor slew rate.
    #[must_use]
    pub fn with_target_velocity(mut self, target_velocity: f64) -> Self {
        self.target_velocity = target_velocity;
        self
    }

    /// Set the minimum measured length below which the motor holds.
    #[must_use]
    pub fn with_min_actual_length(mut self, min_actual_length: f64) -> Self {
        self.min_actual_length = min_actual_length;
        self
    }

    /// Set the minimum rest length.
    #[must_use]
    pub fn with_min_rest_length(mut self, min_rest_length: f64) -> Self {
        self.min_rest_length = min_rest_length;
        self
    }

    /// Set the contact proxy shape.
    #[must_use]
    pub fn with_proxy(mut self, kind: ShapeKind, radius: f64) -> Self {
        self.proxy_kind = kind;
        self.proxy_radius = radius;
        self
    }

    /// Enable history recording.
    #[must_use]
    pub fn with_history(mut self) -> Self {
        self.record_history = true;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SimError::invalid_argument(format!(
                    "{name} must be finite and non-negative, got {value}"
                )))
            }
        }

        non_negative("stiffness", self.stiffness)?;
        non_negative("damping", self.damping)?;
        non_negative("pretension", self.pretension)?;
        non_negative("min_actual_length", self.min_actual_length)?;
        non_negative("min_rest_length", self.min_rest_length)?;

        if self.pretension > 0.0 && self.stiffness <= 0.0 {
            return Err(SimError::invalid_argument(
                "pretension requires positive stiffness",
            ));
        }
        if self.max_tension.is_nan() || self.max_tension < 0.0 {
            return Err(SimError::invalid_argument(format!(
                "max_tension must be non-negative, got {}",
                self.max_tension
            )));
        }
        if !(self.target_velocity > 0.0 && self.target_velocity.is_finite()) {
            return Err(SimError::invalid_argument(format!(
                "target_velocity must be positive, got {}",
                self.target_velocity
            )));
        }
        if !(self.proxy_radius > 0.0 && self.proxy_radius.is_finite()) {
            return Err(SimError::invalid_argument(format!(
                "proxy_radius must be positive, got {}",
                self.proxy_radius
            )));
        }
        Ok(())
    }

    /// Rest length that yields `pretension` at `start_length`.
    pub fn initial_rest_length(&self, start_length: f64) -> Result<f64> {
        let rest_length = if self.pretension > 0.0 {
            start_length - self.pretension / self.stiffness
        } else {
            start_length
        };
        if rest_length > 0.0 {
            Ok(rest_length)
        } else {
            Err(SimError::invalid_argument(format!(
                "pretension {} leaves no rest length on a cable of length {start_length}",
                self.pretension
            )))
        }
    }
}

/// Force produced by a cable for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CableForce {
    /// Cable tension in Newtons (never negative).
    pub tension: f64,

    /// Anchor-to-anchor length.
    pub length: f64,

    /// Elongation velocity used for damping.
    pub velocity: f64,

    /// Unit vector from the first anchor to the second.
    pub direction: Vector3<f64>,

    /// Whether the cable is slack (length at or below rest length).
    pub is_slack: bool,

    /// Whether the tension was clipped to `max_tension`.
    pub limit_exceeded: bool,
}

impl CableForce {
    /// Force applied at the first anchor.
    #[must_use]
    pub fn on_first(&self) -> Vector3<f64> {
        self.direction * self.tension
    }

    /// Force applied at the second anchor.
    #[must_use]
    pub fn on_second(&self) -> Vector3<f64> {
        -self.direction * self.tension
    }
}

/// Spring-damper tension model. Holds constants only.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CableForceModel {
    stiffness: f64,
    damping: f64,
    max_tension: f64,
}

impl CableForceModel {
    /// Create a model from raw coefficients.
    #[must_use]
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            max_tension: f64::INFINITY,
        }
    }

    /// Create a model from a cable config.
    #[must_use]
    pub fn from_config(config: &CableConfig) -> Self {
        Self {
            stiffness: config.stiffness,
            damping: config.damping,
            max_tension: config.max_tension,
        }
    }

    /// Stiffness in N/m.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping in N·s/m.
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Scalar tension for a length, rest length and elongation velocity.
    #[must_use]
    pub fn tension(&self, length: f64, rest_length: f64, velocity: f64) -> f64 {
        self.unclipped_tension(length, rest_length, velocity)
            .max(0.0)
            .min(self.max_tension)
    }

    /// Spring plus bounded damping, before the `max_tension` limit.
    fn unclipped_tension(&self, length: f64, rest_length: f64, velocity: f64) -> f64 {
        if length <= rest_length {
            return 0.0;
        }

        let spring = self.stiffness * (length - rest_length);
        let damping = (self.damping * velocity).clamp(-spring, spring);
        spring + damping
    }

    /// Compute the cable force between two anchor positions.
    ///
    /// `previous_length` is the length measured on the previous step; the
    /// elongation velocity is its finite difference over `dt`.
    ///
    /// # Errors
    ///
    /// [`SimError::DegenerateGeometry`] if `rest_length <= 0` or the anchors
    /// coincide, and [`SimError::InvalidTimestep`] if `dt <= 0`.
    pub fn compute(
        &self,
        first: &Point3<f64>,
        second: &Point3<f64>,
        rest_length: f64,
        previous_length: f64,
        dt: f64,
    ) -> Result<CableForce> {
        sim_types::check_timestep(dt)?;

        let axis = second - first;
        let length = axis.norm();
        if rest_length <= 0.0 || length < GEOMETRY_EPSILON {
            return Err(SimError::degenerate(length, rest_length));
        }

        let velocity = (length - previous_length) / dt;
        let unclipped = self.unclipped_tension(length, rest_length, velocity);
        let tension = unclipped.max(0.0).min(self.max_tension);
        let limit_exceeded = unclipped > self.max_tension;

        Ok(CableForce {
            tension,
            length,
            velocity,
            direction: axis / length,
            is_slack: length <= rest_length,
            limit_exceeded,
        })
    }
}
