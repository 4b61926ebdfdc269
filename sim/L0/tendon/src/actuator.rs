//! Cable actuator: force model, contact proxy and impulse resolver in one
//! steppable unit.
//!
//! # Step Order
//!
//! ```text
//! anchors → CableForceModel → proxy.track → resolver.resolve → anchor forces
//! ```
//!
//! Tension is computed first so the resolver scales impulses with this
//! step's value. Everything the actuator writes to the backend is additive,
//! so stepping several actuators in any order gives the same result.
//!
//! # Rest Length Control
//!
//! The rest length changes only through [`CableActuator::set_target_length`]
//! followed by [`CableActuator::move_motors`], which slews toward the target
//! at `target_velocity` and never overshoots.

use nalgebra::Point3;
use sim_contact::{PhysicsBackend, ProxyId};
use sim_types::{check_timestep, Result, SimError};
use tracing::{debug, warn};

use crate::{
    Anchor, CableConfig, CableForceModel, ContactCollisionProxy, ContactImpulseResolver,
    LengthActuator, ResolvedContact,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-step samples recorded when `record_history` is enabled.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CableHistory {
    /// Measured anchor-to-anchor length.
    pub actual_lengths: Vec<f64>,
    /// Rest length at the time of the step.
    pub rest_lengths: Vec<f64>,
    /// Tension produced by the step.
    pub tensions: Vec<f64>,
}

impl CableHistory {
    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensions.is_empty()
    }

    fn record(&mut self, actual_length: f64, rest_length: f64, tension: f64) {
        self.actual_lengths.push(actual_length);
        self.rest_lengths.push(rest_length);
        self.tensions.push(tension);
    }
}

/// A tensioned cable between two rigid bodies.
#[derive(Debug, Clone)]
pub struct CableActuator {
    name: String,
    config: CableConfig,
    model: CableForceModel,
    anchors: [Anchor; 2],
    proxy: ContactCollisionProxy,
    resolver: ContactImpulseResolver,

    start_length: f64,
    rest_length: f64,
    target_length: f64,
    actual_length: f64,
    velocity: f64,
    tension: f64,

    history: Option<CableHistory>,
    last_contacts: Vec<ResolvedContact>,
}

impl CableActuator {
    /// Build an actuator and register its contact proxy.
    ///
    /// The start length is measured from the anchors' current positions and
    /// the initial rest length is derived from the configured pretension.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidArgument`] for an invalid config, or pretension
    ///   that leaves no rest length
    /// - [`SimError::InvalidBodyId`] if an anchor body is unknown
    /// - [`SimError::DegenerateGeometry`] if the anchors coincide
    /// - [`SimError::UnsupportedShape`] if the backend cannot update the
    ///   proxy shape
    pub fn new<B: PhysicsBackend + ?Sized>(
        config: CableConfig,
        anchor1: Anchor,
        anchor2: Anchor,
        backend: &mut B,
    ) -> Result<Self> {
        config.validate()?;

        let p1 = anchor1.world_position(&*backend)?;
        let p2 = anchor2.world_position(&*backend)?;
        let start_length = (p2 - p1).norm();
        if start_length < crate::cable::GEOMETRY_EPSILON {
            return Err(SimError::degenerate(start_length, 0.0));
        }
        let rest_length = config.initial_rest_length(start_length)?;

        let proxy = ContactCollisionProxy::register(
            backend,
            config.proxy_kind,
            config.proxy_radius,
            &p1,
            &p2,
        )?;
        let resolver = ContactImpulseResolver::new(proxy.id(), [anchor1.body(), anchor2.body()]);

        Ok(Self {
            name: String::new(),
            config,
            model: CableForceModel::from_config(&config),
            anchors: [anchor1, anchor2],
            proxy,
            resolver,
            start_length,
            rest_length,
            target_length: rest_length,
            actual_length: start_length,
            velocity: 0.0,
            tension: 0.0,
            history: config.record_history.then(CableHistory::default),
            last_contacts: Vec::new(),
        })
    }

    /// Attach a name used in log output.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Advance the cable by one step.
    ///
    /// Computes the tension from the current anchor geometry, moves the
    /// contact proxy onto the new geometry, pushes penetrating bodies away
    /// and accumulates the anchor forces on both anchor bodies.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidTimestep`] if `dt <= 0`,
    /// [`SimError::DegenerateGeometry`] if the anchors coincide, or any
    /// backend error. The actuator state is unchanged on error before the
    /// proxy update.
    pub fn step<B: PhysicsBackend + ?Sized>(&mut self, dt: f64, backend: &mut B) -> Result<()> {
        check_timestep(dt)?;

        let [a1, a2] = self.anchors;
        let p1 = a1.world_position(&*backend)?;
        let p2 = a2.world_position(&*backend)?;

        let force = self
            .model
            .compute(&p1, &p2, self.rest_length, self.actual_length, dt)?;
        if force.limit_exceeded {
            warn!(cable = %self.name, tension = force.tension, "cable tension clipped to limit");
        }

        self.actual_length = force.length;
        self.velocity = force.velocity;
        self.tension = force.tension;

        self.proxy.track(backend, &p1, &p2)?;
        self.last_contacts = self
            .resolver
            .resolve(backend, self.tension, self.actual_length, dt)?;

        if self.tension > 0.0 {
            backend.apply_force_at_point(a1.body(), force.on_first(), p1)?;
            backend.apply_force_at_point(a2.body(), force.on_second(), p2)?;
        }

        if let Some(history) = self.history.as_mut() {
            history.record(self.actual_length, self.rest_length, self.tension);
        }

        debug!(
            cable = %self.name,
            length = self.actual_length,
            rest_length = self.rest_length,
            tension = self.tension,
            "cable step"
        );
        Ok(())
    }

    /// Command a new target rest length.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] if `length` is negative or not finite.
    pub fn set_target_length(&mut self, length: f64) -> Result<()> {
        if !(length >= 0.0 && length.is_finite()) {
            return Err(SimError::invalid_argument(format!(
                "target length must be finite and non-negative, got {length}"
            )));
        }
        self.target_length = length;
        Ok(())
    }

    /// Slew the rest length toward the target by at most
    /// `target_velocity * dt`.
    ///
    /// Shortening stops while the measured length is at or below
    /// `min_actual_length`, and the rest length is not pulled below
    /// `min_rest_length`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidTimestep`] if `dt <= 0`.
    pub fn move_motors(&mut self, dt: f64) -> Result<()> {
        check_timestep(dt)?;

        let diff = self.target_length - self.rest_length;
        if diff == 0.0 {
            return Ok(());
        }
        if diff < 0.0 && self.actual_length <= self.config.min_actual_length {
            return Ok(());
        }

        let max_step = self.config.target_velocity * dt;
        let next = if diff.abs() <= max_step {
            self.target_length
        } else {
            self.rest_length + max_step.copysign(diff)
        };

        self.rest_length = if diff < 0.0 {
            next.max(self.config.min_rest_length.min(self.rest_length))
        } else {
            next
        };
        Ok(())
    }

    /// Remove the contact proxy from the backend.
    pub fn teardown<B: PhysicsBackend + ?Sized>(self, backend: &mut B) -> Result<()> {
        self.proxy.release(backend)
    }

    /// Current tension in Newtons.
    #[must_use]
    pub fn tension(&self) -> f64 {
        self.tension
    }

    /// Anchor-to-anchor length measured on the last step.
    #[must_use]
    pub fn actual_length(&self) -> f64 {
        self.actual_length
    }

    /// Anchor-to-anchor length at construction.
    #[must_use]
    pub fn start_length(&self) -> f64 {
        self.start_length
    }

    /// Current rest length.
    #[must_use]
    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    /// Commanded rest length.
    #[must_use]
    pub fn target_length(&self) -> f64 {
        self.target_length
    }

    /// Elongation velocity measured on the last step.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Cable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the cable was built with.
    #[must_use]
    pub fn config(&self) -> &CableConfig {
        &self.config
    }

    /// Both anchors.
    #[must_use]
    pub fn anchors(&self) -> &[Anchor; 2] {
        &self.anchors
    }

    /// Handle of the contact proxy.
    #[must_use]
    pub fn proxy_id(&self) -> ProxyId {
        self.proxy.id()
    }

    /// The contact proxy.
    #[must_use]
    pub fn proxy(&self) -> &ContactCollisionProxy {
        &self.proxy
    }

    /// Contacts resolved on the last step.
    #[must_use]
    pub fn last_contacts(&self) -> &[ResolvedContact] {
        &self.last_contacts
    }

    /// Recorded history, if enabled.
    #[must_use]
    pub fn history(&self) -> Option<&CableHistory> {
        self.history.as_ref()
    }

    /// World positions of both anchors.
    pub fn anchor_positions<B: PhysicsBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<[Point3<f64>; 2]> {
        Ok([
            self.anchors[0].world_position(backend)?,
            self.anchors[1].world_position(backend)?,
        ])
    }
}

impl LengthActuator for CableActuator {
    fn start_length(&self) -> f64 {
        self.start_length
    }

    fn rest_length(&self) -> f64 {
        self.rest_length
    }

    fn actual_length(&self) -> f64 {
        self.actual_length
    }

    fn tension(&self) -> f64 {
        self.tension
    }

    fn set_target_length(&mut self, length: f64) -> Result<()> {
        Self::set_target_length(self, length)
    }

    fn move_motors(&mut self, dt: f64) -> Result<()> {
        Self::move_motors(self, dt)
    }
}
