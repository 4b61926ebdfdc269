//! Randomised rest-length controller.
//!
//! On setup every actuator receives a target drawn uniformly from a band
//! around its start length:
//!
//! ```text
//! [ s − shrink·s , s + extend·s )      defaults: shrink 0.35, extend 0.25
//! ```
//!
//! The motors stay idle until the accumulated step time exceeds the
//! activation time, so the structure can settle under pretension first.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_tendon::{ActuatedModel, LengthActuator};
use sim_types::{check_timestep, Result, SimError};
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Controller;

/// Relative slack on the activation threshold for accumulated `dt` drift.
const ACTIVATION_TOLERANCE: f64 = 1e-9;

/// Band of random targets, as fractions of the start length.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetBand {
    /// Largest shortening, as a fraction of the start length.
    pub shrink_fraction: f64,
    /// Largest lengthening, as a fraction of the start length.
    pub extend_fraction: f64,
}

impl Default for TargetBand {
    fn default() -> Self {
        Self {
            shrink_fraction: 0.35,
            extend_fraction: 0.25,
        }
    }
}

impl TargetBand {
    /// Create a band.
    #[must_use]
    pub const fn new(shrink_fraction: f64, extend_fraction: f64) -> Self {
        Self {
            shrink_fraction,
            extend_fraction,
        }
    }

    /// Lower (inclusive) and upper (exclusive) target for a start length.
    #[must_use]
    pub fn bounds(&self, start_length: f64) -> (f64, f64) {
        (
            start_length - self.shrink_fraction * start_length,
            start_length + self.extend_fraction * start_length,
        )
    }

    /// Draw a target uniformly from the band.
    pub fn sample<R: Rng + ?Sized>(&self, start_length: f64, rng: &mut R) -> f64 {
        let (min, max) = self.bounds(start_length);
        // gen::<f64>() is in [0, 1), and tolerates an empty band
        min + rng.gen::<f64>() * (max - min)
    }

    /// Validate the fractions.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.shrink_fraction) {
            return Err(SimError::invalid_argument(format!(
                "shrink_fraction must be in [0, 1], got {}",
                self.shrink_fraction
            )));
        }
        if !(self.extend_fraction >= 0.0 && self.extend_fraction.is_finite()) {
            return Err(SimError::invalid_argument(format!(
                "extend_fraction must be finite and non-negative, got {}",
                self.extend_fraction
            )));
        }
        Ok(())
    }
}

/// Settings for [`LengthController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LengthControllerConfig {
    /// Nominal length carried by the controller; must be non-negative.
    pub base_length: f64,
    /// Step time that must pass before the motors move, in seconds.
    pub activation_time: f64,
    /// Band the targets are drawn from.
    pub band: TargetBand,
}

impl Default for LengthControllerConfig {
    fn default() -> Self {
        Self {
            base_length: 0.0,
            activation_time: 2.0,
            band: TargetBand::default(),
        }
    }
}

impl LengthControllerConfig {
    /// Default settings with the given base length.
    #[must_use]
    pub fn new(base_length: f64) -> Self {
        Self {
            base_length,
            ..Self::default()
        }
    }

    /// Set the activation time.
    #[must_use]
    pub fn with_activation_time(mut self, activation_time: f64) -> Self {
        self.activation_time = activation_time;
        self
    }

    /// Set the target band.
    #[must_use]
    pub fn with_band(mut self, band: TargetBand) -> Self {
        self.band = band;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_length >= 0.0 && self.base_length.is_finite()) {
            return Err(SimError::invalid_argument(format!(
                "base length must be finite and non-negative, got {}",
                self.base_length
            )));
        }
        if !(self.activation_time >= 0.0 && self.activation_time.is_finite()) {
            return Err(SimError::invalid_argument(format!(
                "activation time must be finite and non-negative, got {}",
                self.activation_time
            )));
        }
        self.band.validate()
    }
}

/// Target assigned to one actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlRecord {
    /// Index of the actuator in the model.
    pub actuator: usize,
    /// Target rest length that was commanded.
    pub target_length: f64,
    /// Band the target was drawn from.
    pub band: (f64, f64),
}

/// Lifecycle state of a [`LengthController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControllerState {
    /// Not attached to a model.
    #[default]
    Uninitialized,
    /// Targets assigned; waiting for the activation time.
    Armed,
    /// Motors moving every step.
    Active,
}

/// Assigns random target lengths and moves the motors after a delay.
#[derive(Debug, Clone)]
pub struct LengthController<R = StdRng> {
    config: LengthControllerConfig,
    rng: R,
    records: Vec<ControlRecord>,
    state: ControllerState,
    elapsed: f64,
}

impl LengthController<StdRng> {
    /// Controller with default settings and a seeded generator.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] if `base_length` is negative.
    pub fn with_seed(base_length: f64, seed: u64) -> Result<Self> {
        Self::new(
            LengthControllerConfig::new(base_length),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Controller with default settings, seeded from the OS.
    pub fn from_entropy(base_length: f64) -> Result<Self> {
        Self::new(LengthControllerConfig::new(base_length), StdRng::from_entropy())
    }
}

impl<R: Rng> LengthController<R> {
    /// Create a controller that owns `rng`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] for an invalid config, including a
    /// negative base length.
    pub fn new(config: LengthControllerConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            records: Vec::new(),
            state: ControllerState::Uninitialized,
            elapsed: 0.0,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Step time accumulated since setup.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Nominal base length.
    pub fn base_length(&self) -> f64 {
        self.config.base_length
    }

    /// Settings.
    pub fn config(&self) -> &LengthControllerConfig {
        &self.config
    }

    /// Targets assigned on setup, indexed by actuator.
    pub fn records(&self) -> &[ControlRecord] {
        &self.records
    }

    /// Record for one actuator.
    pub fn record(&self, actuator: usize) -> Option<&ControlRecord> {
        self.records.get(actuator)
    }

    /// Whether the accumulated time is strictly past the activation time.
    ///
    /// Summing `dt` drifts by a few ulps (twenty steps of 0.1 give
    /// 2.0000000000000004), so times within a relative tolerance of the
    /// threshold still count as not past it.
    fn past_activation_time(&self) -> bool {
        let threshold = self.config.activation_time;
        self.elapsed - threshold > ACTIVATION_TOLERANCE * threshold.max(1.0)
    }
}

impl<M, R> Controller<M> for LengthController<R>
where
    M: ActuatedModel + ?Sized,
    R: Rng,
{
    fn on_setup(&mut self, model: &mut M) -> Result<()> {
        self.records.clear();
        self.elapsed = 0.0;

        let band = self.config.band;
        for (index, actuator) in model.actuators_mut().iter_mut().enumerate() {
            let start = actuator.start_length();
            let target = band.sample(start, &mut self.rng);
            actuator.set_target_length(target)?;
            self.records.push(ControlRecord {
                actuator: index,
                target_length: target,
                band: band.bounds(start),
            });
        }

        self.state = ControllerState::Armed;
        info!(
            actuators = self.records.len(),
            activation_time = self.config.activation_time,
            "length controller armed"
        );
        Ok(())
    }

    fn on_step(&mut self, model: &mut M, dt: f64) -> Result<()> {
        check_timestep(dt)?;
        if self.state == ControllerState::Uninitialized {
            return Ok(());
        }

        self.elapsed += dt;
        if !self.past_activation_time() {
            return Ok(());
        }

        if self.state == ControllerState::Armed {
            info!(elapsed = self.elapsed, "activating cable motors (randomized lengths)");
            self.state = ControllerState::Active;
        }
        for actuator in model.actuators_mut() {
            actuator.move_motors(dt)?;
        }
        Ok(())
    }

    fn on_teardown(&mut self, _model: &mut M) -> Result<()> {
        debug!(records = self.records.len(), "length controller teardown");
        self.records.clear();
        self.elapsed = 0.0;
        self.state = ControllerState::Uninitialized;
        Ok(())
    }
}
