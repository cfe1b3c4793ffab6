//! Per-call inputs to [`CrowdEngine::execute_tick`](crate::CrowdEngine::execute_tick).
//!
//! The driver loop owns a [`SimContext`] and passes it into every tick
//! instead of consulting process-wide state. [`TickInputs`] borrows the
//! data external collaborators refresh each tick.

use biocrowds_springs::MassMap;
use biocrowds_steering::{FluidField, FluidParticle, MarkerAssignment};

/// Driver-owned switches that apply to a whole tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimContext {
    /// When set, ticks are skipped: nothing moves and the tick counter
    /// does not advance.
    pub locked: bool,
}

impl SimContext {
    /// An unlocked context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with `locked` set.
    pub fn locked() -> Self {
        Self { locked: true }
    }

    /// Set or clear the lock.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

/// Collaborator data consumed by one tick.
#[derive(Clone, Copy, Debug)]
pub struct TickInputs<'a> {
    /// Markers currently assigned to each agent.
    pub markers: &'a MarkerAssignment,
    /// Agent masses for the spring stage. Required only when springs exert
    /// force this tick.
    pub masses: Option<&'a MassMap>,
    /// Per-cell fluid samples, blended in when fluid coupling is enabled.
    pub fluid: Option<&'a FluidField>,
    /// Raw fluid particles, binned with the configured fluid constants
    /// when no pre-binned field is supplied.
    pub particles: Option<&'a [FluidParticle]>,
}

impl<'a> TickInputs<'a> {
    /// Inputs carrying only a marker assignment.
    pub fn new(markers: &'a MarkerAssignment) -> Self {
        Self {
            markers,
            masses: None,
            fluid: None,
            particles: None,
        }
    }

    /// Attach a mass map.
    pub fn with_masses(mut self, masses: &'a MassMap) -> Self {
        self.masses = Some(masses);
        self
    }

    /// Attach a fluid field.
    pub fn with_fluid(mut self, fluid: &'a FluidField) -> Self {
        self.fluid = Some(fluid);
        self
    }

    /// Attach this frame's fluid particles.
    pub fn with_particles(mut self, particles: &'a [FluidParticle]) -> Self {
        self.particles = Some(particles);
        self
    }
}
