//! Sub-stepped spring force integration.
//!
//! Positions and steps live in [`PingPong`] buffers for the duration of
//! one tick. Every sub-step reads only the current buffers and writes
//! only the next ones:
//!
//! 1. solve: one force pair per spring, pushed into a [`MultiMap`]
//!    keyed by endpoint, in parallel over springs
//! 2. apply: per agent, sum its forces, `v += F/m·dt`, `p += v·dt`, in
//!    parallel over agents; agents without forces carry over unchanged
//! 3. swap
//!
//! After the last sub-step the buffers are settled so the result sits in
//! the first slot however many sub-steps ran.

use crate::mass::MassMap;
use crate::network::SpringNetwork;
use biocrowds_arena::{MultiMap, PingPong};
use biocrowds_core::{Agent, AgentId, StageError, Vec3};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{error, trace};

/// Agent → vector, for positions and steps.
pub type VecMap = HashMap<AgentId, Vec3>;

/// Result of one tick of spring integration.
#[derive(Clone, Debug, Default)]
pub struct SpringIntegration {
    /// Sub-stepped position of every agent.
    pub positions: VecMap,
    /// Coupled step of every agent.
    pub steps: VecMap,
    /// Sub-steps performed. Zero when no spring was live.
    pub sub_steps: u32,
    /// Agents that received at least one force on the last sub-step.
    pub forced_agents: usize,
}

/// Fixed-step integrator for the spring network.
///
/// Owns the force buckets, which are cleared every sub-step and only
/// reallocated when the crowd outgrows them.
#[derive(Debug)]
pub struct SpringSolver {
    dt: f32,
    frames_per_second: f32,
    forces: MultiMap<AgentId, Vec3>,
}

impl SpringSolver {
    /// Integrator with sub-step `dt` for a simulation running at
    /// `frames_per_second`.
    pub fn new(dt: f32, frames_per_second: f32) -> Self {
        Self {
            dt,
            frames_per_second,
            forces: MultiMap::new(),
        }
    }

    /// Sub-step length.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Agents the force buckets currently have room for.
    pub fn force_capacity(&self) -> usize {
        self.forces.capacity()
    }

    /// Sub-steps per tick: `ceil(1/FPS · dt)`, at least one.
    pub fn iterations(&self) -> u32 {
        ((1.0 / self.frames_per_second) * self.dt).ceil().max(1.0) as u32
    }

    /// Integrate spring forces over one tick.
    ///
    /// `steps` holds the pre-coupling step of each agent; agents missing
    /// from it start from their stored step. Fails without touching any
    /// agent if a spring references an agent outside `agents`, if forces
    /// exist but `masses` is `None`, or if a forced agent's mass is
    /// missing or invalid.
    pub fn integrate(
        &mut self,
        network: &SpringNetwork,
        agents: &[Agent],
        steps: &VecMap,
        masses: Option<&MassMap>,
    ) -> Result<SpringIntegration, StageError> {
        let initial_positions: VecMap = agents.iter().map(|a| (a.id, a.position)).collect();
        let initial_steps: VecMap = agents
            .iter()
            .map(|a| (a.id, steps.get(&a.id).copied().unwrap_or(a.step)))
            .collect();

        if network.is_empty() {
            return Ok(SpringIntegration {
                positions: initial_positions,
                steps: initial_steps,
                sub_steps: 0,
                forced_agents: 0,
            });
        }

        let mut positions = PingPong::from_initial(initial_positions);
        let mut velocities = PingPong::from_initial(initial_steps);
        if self.forces.ensure_capacity(agents.len()) {
            trace!(agents = agents.len(), "force buckets reallocated");
        }
        let forces = &self.forces;
        let iterations = self.iterations();
        let dt = self.dt;
        let mut forced_agents = 0;

        for _ in 0..iterations {
            forces.clear();
            let (pos, next_pos) = positions.split();
            let (vel, next_vel) = velocities.split();
            let lookup = |id: AgentId| -> Result<(Vec3, Vec3), StageError> {
                match (pos.get(&id), vel.get(&id)) {
                    (Some(p), Some(v)) => Ok((*p, *v)),
                    _ => Err(StageError::UnknownAgent { id }),
                }
            };

            // Solve.
            network.springs().par_values().try_for_each(|spring| -> Result<(), StageError> {
                let (pa, va) = lookup(spring.a)?;
                let (pb, vb) = lookup(spring.b)?;
                let (fa, fb) = spring.forces(pa, va, pb, vb);
                forces.push(spring.a, fa);
                forces.push(spring.b, fb);
                Ok(())
            })?;

            // Apply.
            let updates: Vec<(AgentId, Vec3, Vec3)> = agents
                .par_iter()
                .map(|agent| -> Result<(AgentId, Vec3, Vec3), StageError> {
                    let (p, v) = lookup(agent.id)?;
                    let Some(total) = forces.sum(&agent.id) else {
                        return Ok((agent.id, p, v));
                    };
                    let mass = masses
                        .ok_or(StageError::MassMapUnavailable)
                        .and_then(|m| m.require(agent.id))
                        .map_err(|e| {
                            error!(agent = %agent.id, error = %e, "spring integration aborted");
                            e
                        })?;
                    let v = v + total / mass * dt;
                    Ok((agent.id, p + v * dt, v))
                })
                .collect::<Result<_, _>>()?;

            forced_agents = forces.len();
            next_pos.clear();
            next_vel.clear();
            for (id, p, v) in updates {
                next_pos.insert(id, p);
                next_vel.insert(id, v);
            }
            positions.swap();
            velocities.swap();
        }

        if iterations % 2 == 1 {
            positions.settle();
            velocities.settle();
        }
        trace!(
            springs = network.len(),
            sub_steps = iterations,
            forced_agents,
            "spring integration"
        );

        Ok(SpringIntegration {
            positions: positions.into_current(),
            steps: velocities.into_current(),
            sub_steps: iterations,
            forced_agents,
        })
    }
}
