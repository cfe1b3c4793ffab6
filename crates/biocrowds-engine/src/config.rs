//! Experiment configuration, validation, and error types.
//!
//! [`CrowdConfig`] is the input for constructing a [`CrowdEngine`]. Every
//! field has a default, so a TOML document only needs to name what it
//! changes. [`validate()`](CrowdConfig::validate) checks the numeric
//! invariants the stages rely on.
//!
//! [`CrowdEngine`]: crate::CrowdEngine

use biocrowds_core::{Agent, AgentId, Coupling, Crowd, Vec3, WorldExtent};
use biocrowds_space::SpaceError;
use biocrowds_springs::{SpringParams, SpringSolver};
use biocrowds_steering::{FluidParams, GoalPolicy, Waypoints};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating a [`CrowdConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The world extent is zero, negative or not finite.
    #[error("world extent must be finite and positive, got {x} x {z}")]
    InvalidExtent {
        /// Extent along x.
        x: f32,
        /// Extent along z.
        z: f32,
    },
    /// `cell_width` is zero, negative or not finite.
    #[error("cell_width must be finite and positive, got {value}")]
    InvalidCellWidth {
        /// The invalid value.
        value: f32,
    },
    /// `frames_per_second` is zero, negative or not finite.
    #[error("frames_per_second must be finite and positive, got {value}")]
    InvalidFrameRate {
        /// The invalid value.
        value: f32,
    },
    /// `springs.sub_step_dt` is zero, negative or not finite.
    #[error("springs.sub_step_dt must be finite and positive, got {value}")]
    InvalidSubStep {
        /// The invalid value.
        value: f32,
    },
    /// `springs.damping` is negative or not finite.
    #[error("springs.damping must be finite and non-negative, got {value}")]
    InvalidDamping {
        /// The invalid value.
        value: f32,
    },
    /// A spring constant other than damping is not finite.
    #[error("springs.{name} must be finite, got {value}")]
    NonFiniteSpring {
        /// Which parameter.
        name: &'static str,
        /// The invalid value.
        value: f32,
    },
    /// Waypoint cycling is on but no waypoints are configured.
    #[error("waypoint_cycling requires at least one waypoint")]
    NoWaypoints,
    /// `goal_reached_distance` is zero, negative or not finite.
    #[error("goal_reached_distance must be finite and positive, got {value}")]
    InvalidGoalDistance {
        /// The invalid value.
        value: f32,
    },
    /// `coupling.distance` is negative or not finite.
    #[error("coupling.distance must be finite and non-negative, got {value}")]
    InvalidCouplingDistance {
        /// The invalid value.
        value: f32,
    },
    /// A fluid mass is zero, negative or not finite.
    #[error("fluid.{name} must be finite and positive, got {value}")]
    InvalidFluidMass {
        /// Which mass.
        name: &'static str,
        /// The invalid value.
        value: f32,
    },
    /// `fluid.height_threshold` is not finite.
    #[error("fluid.height_threshold must be finite, got {value}")]
    InvalidHeightThreshold {
        /// The invalid value.
        value: f32,
    },
    /// The document is not valid TOML or does not match the schema.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Grid or occupancy tree construction failed.
    #[error("space: {0}")]
    Space(#[from] SpaceError),
}

// ── Sections ───────────────────────────────────────────────────────

/// Coupling capacity given to agents created through [`CrowdConfig::make_agent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CouplingConfig {
    /// Distance under which two agents may couple. Default: 3.0.
    pub distance: f32,
    /// Maximum simultaneous springs per agent. Default: 2.
    pub max_couplings: u32,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            distance: 3.0,
            max_couplings: 2,
        }
    }
}

/// Spring subsystem switches and constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpringConfig {
    /// Run the spring stages. Default: false.
    pub enabled: bool,
    /// Spring constant of new springs. Default: -500.
    pub stiffness: f32,
    /// Damping of new springs. Default: 3.
    pub damping: f32,
    /// Rest length of new springs. Default: 0.1.
    pub rest_length: f32,
    /// Sub-step length. Default: 0.0005.
    pub sub_step_dt: f32,
    /// Hard live spring limit. Default: unset, the network then grows to
    /// whatever the agents' coupling capacities allow.
    pub max_springs: Option<usize>,
}

impl Default for SpringConfig {
    fn default() -> Self {
        let params = SpringParams::default();
        Self {
            enabled: false,
            stiffness: params.stiffness,
            damping: params.damping,
            rest_length: params.rest_length,
            sub_step_dt: 0.0005,
            max_springs: None,
        }
    }
}

/// External fluid coupling switches and constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FluidConfig {
    /// Blend the supplied fluid field into agent steps. Default: false.
    pub enabled: bool,
    /// Agent mass, kg. Default: 65.
    pub agent_mass: f32,
    /// Fluid particle mass, kg. Default: 0.001.
    pub particle_mass: f32,
    /// Particles above this height are ignored. Default: 1.7.
    pub height_threshold: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        let params = FluidParams::default();
        Self {
            enabled: false,
            agent_mass: params.agent_mass,
            particle_mass: params.particle_mass,
            height_threshold: params.height_threshold,
        }
    }
}

// ── CrowdConfig ────────────────────────────────────────────────────

/// Full configuration of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrowdConfig {
    /// Walkable rectangle. Default: 100 × 50.
    pub world: WorldExtent,
    /// Side of one grid cell. Default: 2.0.
    pub cell_width: f32,
    /// Simulation frame rate. Default: 32.
    pub frames_per_second: f32,
    /// Seed for waypoint draws. Default: 0.
    pub seed: u64,
    /// Points agents are sent to when a sub-goal is reached.
    pub waypoints: Vec<Vec3>,
    /// Reassign reached sub-goals from `waypoints`. Default: false.
    pub waypoint_cycling: bool,
    /// Distance at which a sub-goal counts as reached. Default: 1.0.
    pub goal_reached_distance: f32,
    /// Agent coupling defaults.
    pub coupling: CouplingConfig,
    /// Spring subsystem.
    pub springs: SpringConfig,
    /// Fluid coupling.
    pub fluid: FluidConfig,
    /// Maximum depth of the occupancy quad-tree. Default: 4.
    pub quad_tree_depth: u32,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            world: WorldExtent::default(),
            cell_width: 2.0,
            frames_per_second: 32.0,
            seed: 0,
            waypoints: vec![
                Vec3::new(25.0, 0.0, 25.0),
                Vec3::new(45.0, 0.0, 25.0),
                Vec3::new(25.0, 0.0, 45.0),
                Vec3::new(15.0, 0.0, 25.0),
                Vec3::new(25.0, 0.0, 15.0),
            ],
            waypoint_cycling: false,
            goal_reached_distance: 1.0,
            coupling: CouplingConfig::default(),
            springs: SpringConfig::default(),
            fluid: FluidConfig::default(),
            quad_tree_depth: 4,
        }
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl CrowdConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.world.is_valid() {
            return Err(ConfigError::InvalidExtent {
                x: self.world.x,
                z: self.world.z,
            });
        }
        if !positive(self.cell_width) {
            return Err(ConfigError::InvalidCellWidth {
                value: self.cell_width,
            });
        }
        if !positive(self.frames_per_second) {
            return Err(ConfigError::InvalidFrameRate {
                value: self.frames_per_second,
            });
        }
        if !positive(self.goal_reached_distance) {
            return Err(ConfigError::InvalidGoalDistance {
                value: self.goal_reached_distance,
            });
        }
        if self.waypoint_cycling && self.waypoints.is_empty() {
            return Err(ConfigError::NoWaypoints);
        }
        let d = self.coupling.distance;
        if !d.is_finite() || d < 0.0 {
            return Err(ConfigError::InvalidCouplingDistance { value: d });
        }

        let s = &self.springs;
        if !positive(s.sub_step_dt) {
            return Err(ConfigError::InvalidSubStep {
                value: s.sub_step_dt,
            });
        }
        if !s.damping.is_finite() || s.damping < 0.0 {
            return Err(ConfigError::InvalidDamping { value: s.damping });
        }
        for (name, value) in [("stiffness", s.stiffness), ("rest_length", s.rest_length)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteSpring { name, value });
            }
        }

        let f = &self.fluid;
        for (name, value) in [
            ("agent_mass", f.agent_mass),
            ("particle_mass", f.particle_mass),
        ] {
            if !positive(value) {
                return Err(ConfigError::InvalidFluidMass { name, value });
            }
        }
        if !f.height_threshold.is_finite() {
            return Err(ConfigError::InvalidHeightThreshold {
                value: f.height_threshold,
            });
        }
        Ok(())
    }

    /// An agent at `position` with this configuration's coupling defaults.
    pub fn make_agent(&self, id: AgentId, position: Vec3) -> Agent {
        Agent::new(id, position).with_coupling(Coupling::new(
            self.coupling.max_couplings,
            self.coupling.distance,
        ))
    }

    /// Parameters for newly created springs.
    pub fn spring_params(&self) -> SpringParams {
        SpringParams {
            stiffness: self.springs.stiffness,
            damping: self.springs.damping,
            rest_length: self.springs.rest_length,
        }
    }

    /// Integrator for the spring stage.
    pub fn spring_solver(&self) -> SpringSolver {
        SpringSolver::new(self.springs.sub_step_dt, self.frames_per_second)
    }

    /// Live spring limit for `crowd`.
    ///
    /// An explicit `springs.max_springs` is used as is. Otherwise it is
    /// half the crowd's summed `max_couplings`: every spring takes one slot
    /// at each end, so the network can never outgrow it.
    pub fn spring_capacity(&self, crowd: &Crowd) -> usize {
        self.springs.max_springs.unwrap_or_else(|| {
            let slots: usize = crowd
                .iter()
                .map(|a| a.coupling.max_couplings as usize)
                .sum();
            slots / 2
        })
    }

    /// Sub-goal refresh policy.
    pub fn goal_policy(&self) -> GoalPolicy {
        match Waypoints::new(self.waypoints.clone()) {
            Some(w) if self.waypoint_cycling => {
                GoalPolicy::cycling(w, self.goal_reached_distance, self.seed)
            }
            _ => GoalPolicy {
                waypoints: None,
                reached_distance: self.goal_reached_distance,
                seed: self.seed,
            },
        }
    }

    /// Constants for binning and blending fluid.
    pub fn fluid_params(&self) -> FluidParams {
        FluidParams {
            agent_mass: self.fluid.agent_mass,
            particle_mass: self.fluid.particle_mass,
            height_threshold: self.fluid.height_threshold,
            frame_dt: 1.0 / self.frames_per_second,
        }
    }
}
