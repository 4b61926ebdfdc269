//! The collection of cables belonging to one structure.

use sim_contact::PhysicsBackend;
use sim_types::{check_timestep, Result};
use tracing::{debug, warn};

use crate::{ActuatedModel, CableActuator};

/// Owns every cable of a tensegrity structure and steps them together.
///
/// Cables resolve contacts against the backend independently and only
/// accumulate forces, so iteration order does not affect the outcome.
#[derive(Debug, Clone, Default)]
pub struct CableNetwork {
    cables: Vec<CableActuator>,
}

impl CableNetwork {
    /// Create an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cable, returning its index.
    pub fn add(&mut self, cable: CableActuator) -> usize {
        self.cables.push(cable);
        self.cables.len() - 1
    }

    /// Cable at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CableActuator> {
        self.cables.get(index)
    }

    /// Mutable cable at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut CableActuator> {
        self.cables.get_mut(index)
    }

    /// Look up a cable by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CableActuator> {
        self.cables.iter().find(|cable| cable.name() == name)
    }

    /// Number of cables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cables.len()
    }

    /// Whether the network has no cables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cables.is_empty()
    }

    /// Iterate over the cables.
    pub fn iter(&self) -> std::slice::Iter<'_, CableActuator> {
        self.cables.iter()
    }

    /// Step every cable.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a cable; cables after it are not
    /// stepped.
    pub fn step<B: PhysicsBackend + ?Sized>(&mut self, dt: f64, backend: &mut B) -> Result<()> {
        check_timestep(dt)?;
        for cable in &mut self.cables {
            cable.step(dt, backend)?;
        }
        Ok(())
    }

    /// Sum of all cable tensions.
    #[must_use]
    pub fn total_tension(&self) -> f64 {
        self.cables.iter().map(CableActuator::tension).sum()
    }

    /// Remove every cable and release their proxies.
    ///
    /// Every cable is released even if an earlier release fails.
    ///
    /// # Errors
    ///
    /// The first error returned by the backend.
    pub fn teardown<B: PhysicsBackend + ?Sized>(&mut self, backend: &mut B) -> Result<()> {
        debug!(cables = self.cables.len(), "tearing down cable network");
        let mut first_error = None;
        for cable in self.cables.drain(..) {
            if let Err(err) = cable.teardown(backend) {
                warn!(error = %err, "cable proxy release failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl ActuatedModel for CableNetwork {
    type Actuator = CableActuator;

    fn actuators(&self) -> &[CableActuator] {
        &self.cables
    }

    fn actuators_mut(&mut self) -> &mut [CableActuator] {
        &mut self.cables
    }
}

impl<'a> IntoIterator for &'a CableNetwork {
    type Item = &'a CableActuator;
    type IntoIter = std::slice::Iter<'a, CableActuator>;

    fn into_iter(self) -> Self::IntoIter {
        self.cables.iter()
    }
}
