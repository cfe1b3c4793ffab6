//! Coupling to an external fluid velocity field.
//!
//! The fluid solver itself lives outside the engine. It hands over either
//! per-cell samples directly or raw particles, which are binned into the
//! same cells the grid index uses. Each agent's step is then blended with
//! the momentum of its home cell as a perfectly inelastic collision.

use biocrowds_core::{Agent, Vec3, WorldExtent};
use biocrowds_space::{CellGrid, CellKey};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::trace;

/// Physical constants of the fluid coupling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidParams {
    /// Mass of one agent, kg.
    pub agent_mass: f32,
    /// Mass of one fluid particle, kg.
    pub particle_mass: f32,
    /// Particles above this height do not touch agents.
    pub height_threshold: f32,
    /// Time between fluid frames, used to turn displacements into velocities.
    pub frame_dt: f32,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            agent_mass: 65.0,
            particle_mass: 0.001,
            height_threshold: 1.7,
            frame_dt: 1.0 / 32.0,
        }
    }
}

/// One fluid particle as reported by the solver for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidParticle {
    /// Particle position.
    pub position: Vec3,
    /// Particle displacement over one fluid frame.
    pub velocity: Vec3,
}

/// Aggregate fluid state of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FluidSample {
    /// Total momentum of the particles in the cell.
    pub momentum: Vec3,
    /// Total mass of the particles in the cell.
    pub mass: f32,
}

impl FluidSample {
    fn merge(self, other: FluidSample) -> FluidSample {
        FluidSample {
            momentum: self.momentum + other.momentum,
            mass: self.mass + other.mass,
        }
    }
}

/// Blend a step with a cell sample: `(v·m_a + P) / (m_a + m_c)`, y zeroed.
pub fn blend(step: Vec3, sample: FluidSample, agent_mass: f32) -> Vec3 {
    let v = (step * agent_mass + sample.momentum) / (agent_mass + sample.mass);
    Vec3::new(v.x, 0.0, v.z)
}

/// Per-cell fluid samples for one tick.
#[derive(Clone, Debug)]
pub struct FluidField {
    grid: CellGrid,
    cells: HashMap<CellKey, FluidSample>,
}

impl FluidField {
    /// A field with no samples.
    pub fn new(grid: CellGrid) -> Self {
        Self {
            grid,
            cells: HashMap::new(),
        }
    }

    /// Set the sample of one cell.
    pub fn insert(&mut self, key: CellKey, sample: FluidSample) {
        self.cells.insert(key, sample);
    }

    /// Bin particles into cells.
    ///
    /// Particles above the height threshold or outside the world are
    /// ignored. Each remaining particle adds `velocity / frame_dt ×
    /// particle_mass` momentum and `particle_mass` mass to its cell.
    pub fn from_particles(
        grid: CellGrid,
        extent: WorldExtent,
        particles: &[FluidParticle],
        params: &FluidParams,
    ) -> Self {
        let cells = particles
            .par_iter()
            .filter(|p| p.position.y <= params.height_threshold && extent.contains(p.position))
            .fold(HashMap::new, |mut acc: HashMap<CellKey, FluidSample>, p| {
                let sample = FluidSample {
                    momentum: p.velocity / params.frame_dt * params.particle_mass,
                    mass: params.particle_mass,
                };
                let slot = acc.entry(grid.key_for(p.position)).or_default();
                *slot = slot.merge(sample);
                acc
            })
            .reduce(HashMap::new, |mut a, b| {
                for (key, sample) in b {
                    let slot = a.entry(key).or_default();
                    *slot = slot.merge(sample);
                }
                a
            });
        Self { grid, cells }
    }

    /// Sample of the cell containing `p`.
    pub fn sample_at(&self, p: Vec3) -> Option<FluidSample> {
        self.cells.get(&self.grid.key_for(p)).copied()
    }

    /// Sample of one cell.
    pub fn get(&self, key: CellKey) -> Option<FluidSample> {
        self.cells.get(&key).copied()
    }

    /// Number of cells with a sample.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell has a sample.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Blend each agent's step with its home cell. Agents in cells without
    /// fluid are untouched. Returns the number of agents blended.
    pub fn apply(&self, agents: &mut [Agent], agent_mass: f32) -> usize {
        let blended: usize = agents
            .par_iter_mut()
            .map(|agent| match self.sample_at(agent.position) {
                Some(sample) => {
                    agent.step = blend(agent.step, sample, agent_mass);
                    1
                }
                None => 0,
            })
            .sum();
        trace!(blended, cells = self.cells.len(), "fluid blend");
        blended
    }
}
