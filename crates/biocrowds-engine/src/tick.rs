//! Single-threaded tick driver.
//!
//! [`CrowdEngine`] runs the per-tick pipeline over the crowd and spring
//! network. Every tick works on the staging half of a [`PingPong`]: it is
//! refreshed from the committed half, mutated stage by stage, and swapped
//! in only when all stages succeed. A failing stage abandons the staging
//! copy, so committed positions, goals, couplings and the tick counter
//! are untouched.

use std::time::Instant;

use biocrowds_arena::PingPong;
use biocrowds_core::{AgentId, Crowd, CrowdError, StageError, StepError, TickId, Vec3};
use biocrowds_space::{CellGrid, GridIndex};
use biocrowds_springs::{
    decide_couplings, decouple, effect_couplings, SpringNetwork, SpringParams, SpringSolver,
};
use biocrowds_steering::{
    compute_steps, integrate_positions, FluidField, FluidParams, GoalPolicy, MarkerWeights,
};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, CrowdConfig};
use crate::context::{SimContext, TickInputs};
use crate::metrics::StepMetrics;
use crate::record::FrameRecord;

// Compile-time assertion: CrowdEngine can move to a driver thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<CrowdEngine>();
    }
};

// ── TickOutcome ────────────────────────────────────────────────────

/// What a call to [`CrowdEngine::execute_tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The context was locked; nothing changed.
    Locked,
    /// The tick ran and its state is committed.
    Advanced {
        /// The tick just committed.
        tick: TickId,
        /// Metrics for the tick.
        metrics: StepMetrics,
    },
}

impl TickOutcome {
    /// Whether the tick was skipped.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

// ── CrowdState ─────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct CrowdState {
    crowd: Crowd,
    network: SpringNetwork,
}

fn stage_failed(stage: &'static str) -> impl FnOnce(StageError) -> StepError {
    move |reason| StepError::StageFailed { stage, reason }
}

fn micros(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

// ── CrowdEngine ────────────────────────────────────────────────────

/// Owns one run: the crowd, its spring network and per-tick scratch.
pub struct CrowdEngine {
    config: CrowdConfig,
    state: PingPong<CrowdState>,
    index: GridIndex,
    weights: MarkerWeights,
    solver: SpringSolver,
    spring_params: SpringParams,
    goal_policy: GoalPolicy,
    fluid_params: FluidParams,
    current_tick: TickId,
    last_metrics: StepMetrics,
}

impl CrowdEngine {
    /// Validate `config` and take ownership of `crowd`.
    pub fn new(config: CrowdConfig, crowd: Crowd) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = CellGrid::new(config.cell_width)?;
        let index =
            GridIndex::with_capacity(grid, config.world, config.quad_tree_depth, crowd.len())?;
        let network = SpringNetwork::new(config.spring_capacity(&crowd));

        info!(
            agents = crowd.len(),
            cell_width = config.cell_width,
            springs = config.springs.enabled,
            fluid = config.fluid.enabled,
            sub_steps = config.spring_solver().iterations(),
            "crowd engine created"
        );

        Ok(Self {
            weights: MarkerWeights::with_capacity(crowd.len()),
            solver: config.spring_solver(),
            spring_params: config.spring_params(),
            goal_policy: config.goal_policy(),
            fluid_params: config.fluid_params(),
            state: PingPong::from_initial(CrowdState { crowd, network }),
            index,
            config,
            current_tick: TickId(0),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Run one tick.
    ///
    /// A locked `ctx` makes the call a logged no-op returning
    /// [`TickOutcome::Locked`]. Otherwise the stages run in order: grid
    /// index, marker weights, steering, then (when enabled) spring forces
    /// and the coupling lifecycle, fluid blending, and finally position
    /// integration.
    pub fn execute_tick(
        &mut self,
        ctx: &SimContext,
        inputs: &TickInputs<'_>,
    ) -> Result<TickOutcome, StepError> {
        if ctx.locked {
            warn!(tick = %self.current_tick, "simulation locked, tick skipped");
            return Ok(TickOutcome::Locked);
        }

        let tick_start = Instant::now();
        let next_tick = self.current_tick.next();
        let mut metrics = StepMetrics::default();

        let (committed, staging) = self.state.split();
        staging.clone_from(committed);
        let CrowdState { crowd, network } = staging;
        metrics.agent_count = crowd.len();

        // 1. Grid index.
        let start = Instant::now();
        self.index.rebuild(crowd.as_slice());
        metrics.index_us = micros(start);

        // 2. Marker weights.
        let start = Instant::now();
        metrics.weighted_agents = self.weights.compute(crowd.as_slice(), inputs.markers);
        metrics.weights_us = micros(start);

        // 3. Steering.
        let start = Instant::now();
        let steps = compute_steps(crowd.as_mut_slice(), inputs.markers, &self.weights);
        metrics.steering_us = micros(start);

        // 4. Springs.
        if self.config.springs.enabled {
            let start = Instant::now();
            let integration = self
                .solver
                .integrate(network, crowd.as_slice(), &steps, inputs.masses)
                .map_err(stage_failed("spring_forces"))?;
            for agent in crowd.as_mut_slice() {
                if let Some(step) = integration.steps.get(&agent.id) {
                    agent.step = *step;
                }
            }
            metrics.sub_steps = integration.sub_steps;
            metrics.springs_us = micros(start);

            let start = Instant::now();
            metrics.springs_removed = decouple(crowd, network).map_err(stage_failed("decouple"))?;
            let candidates = decide_couplings(crowd, &self.index);
            metrics.candidates = candidates.len();
            if self.config.springs.max_springs.is_none() {
                network.ensure_capacity(self.config.spring_capacity(crowd));
            }
            metrics.springs_created =
                effect_couplings(crowd, network, &candidates, &self.spring_params)
                    .map_err(stage_failed("couple"))?;
            metrics.coupling_us = micros(start);
        }
        metrics.spring_count = network.len();

        // 5. Fluid. A pre-binned field wins over raw particles.
        if self.config.fluid.enabled {
            let start = Instant::now();
            let binned;
            let field = match (inputs.fluid, inputs.particles) {
                (Some(field), _) => Some(field),
                (None, Some(particles)) => {
                    binned = FluidField::from_particles(
                        *self.index.grid(),
                        self.config.world,
                        particles,
                        &self.fluid_params,
                    );
                    Some(&binned)
                }
                (None, None) => None,
            };
            if let Some(field) = field {
                metrics.fluid_blended =
                    field.apply(crowd.as_mut_slice(), self.fluid_params.agent_mass);
                metrics.fluid_us = micros(start);
            }
        }

        // 6. Integrate and commit.
        let start = Instant::now();
        metrics.goals_reassigned = integrate_positions(
            crowd.as_mut_slice(),
            self.config.world,
            &self.goal_policy,
            next_tick,
        );
        metrics.integrate_us = micros(start);

        self.state.swap();
        self.current_tick = next_tick;
        metrics.total_us = micros(tick_start);
        self.last_metrics = metrics.clone();

        debug!(
            tick = %next_tick,
            springs = metrics.spring_count,
            created = metrics.springs_created,
            removed = metrics.springs_removed,
            goals = metrics.goals_reassigned,
            total_us = metrics.total_us,
            "tick committed"
        );

        Ok(TickOutcome::Advanced {
            tick: next_tick,
            metrics,
        })
    }

    /// Move an agent between ticks, keeping its step and goal.
    ///
    /// The position is clamped into the world.
    pub fn place_agent(&mut self, id: AgentId, position: Vec3) -> Result<(), CrowdError> {
        let world = self.config.world;
        let agent = self
            .state
            .current_mut()
            .crowd
            .get_mut(id)
            .ok_or(CrowdError::UnknownAgent { id })?;
        agent.position = world.clamp(position);
        Ok(())
    }

    /// The committed crowd.
    pub fn crowd(&self) -> &Crowd {
        &self.state.current().crowd
    }

    /// The committed spring network.
    pub fn network(&self) -> &SpringNetwork {
        &self.state.current().network
    }

    /// Live spring count of `id`.
    pub fn coupling_count(&self, id: AgentId) -> Option<u32> {
        self.crowd().get(id).map(|a| a.coupling.current)
    }

    /// Committed state as a loggable record.
    pub fn frame(&self) -> FrameRecord {
        FrameRecord::capture(self.current_tick, self.crowd(), self.network())
    }

    /// The grid index built by the last tick.
    pub fn index(&self) -> &GridIndex {
        &self.index
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &CrowdConfig {
        &self.config
    }

    /// Last committed tick (0 before the first).
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Metrics of the last committed tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}
