//! The per-agent record mutated by the tick pipeline.

use crate::id::AgentId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Final destination and the waypoint currently steered towards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentGoal {
    /// Where the agent ultimately wants to go.
    pub end_goal: Vec3,
    /// The immediate waypoint; steering pulls towards this point.
    pub sub_goal: Vec3,
}

impl AgentGoal {
    /// A goal whose sub-goal is the end goal itself.
    pub fn direct(end_goal: Vec3) -> Self {
        Self {
            end_goal,
            sub_goal: end_goal,
        }
    }
}

/// Spring coupling capacity of one agent.
///
/// `current` is a count, not a flag: an agent with `current == 0` is
/// uncoupled, anything up to `max_couplings` is coupled. Only the
/// connect and disconnect transitions touch `current`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    /// Maximum simultaneous springs.
    pub max_couplings: u32,
    /// Live springs attached to this agent.
    pub current: u32,
    /// Distance under which this agent may couple to a neighbour.
    pub distance: f32,
}

impl Coupling {
    /// Capacity `max_couplings` at `distance`, with no live springs.
    pub fn new(max_couplings: u32, distance: f32) -> Self {
        Self {
            max_couplings,
            current: 0,
            distance,
        }
    }

    /// Whether one more spring may attach.
    pub fn has_capacity(&self) -> bool {
        self.current < self.max_couplings
    }
}

impl Default for Coupling {
    fn default() -> Self {
        Self::new(2, 3.0)
    }
}

/// A simulated pedestrian.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable identifier assigned at spawn.
    pub id: AgentId,
    /// Committed position. `y` stays on the ground plane.
    pub position: Vec3,
    /// Body radius.
    pub radius: f32,
    /// Upper bound on the length of one step.
    pub max_speed: f32,
    /// Destination and current waypoint.
    pub goal: AgentGoal,
    /// Displacement applied on the last committed tick.
    pub step: Vec3,
    /// Spring capacity and live count.
    pub coupling: Coupling,
    /// Survival state. Agents at 0 take no part in coupling decisions.
    pub survival: u32,
}

impl Agent {
    /// Default body radius.
    pub const DEFAULT_RADIUS: f32 = 1.0;
    /// Default maximum speed, in units per tick.
    pub const DEFAULT_MAX_SPEED: f32 = 1.3;

    /// An agent at `position` heading straight for its own position.
    pub fn new(id: AgentId, position: Vec3) -> Self {
        Self {
            id,
            position,
            radius: Self::DEFAULT_RADIUS,
            max_speed: Self::DEFAULT_MAX_SPEED,
            goal: AgentGoal::direct(position),
            step: Vec3::ZERO,
            coupling: Coupling::default(),
            survival: 1,
        }
    }

    /// Set the goal, with the sub-goal equal to the goal.
    pub fn with_goal(mut self, goal: Vec3) -> Self {
        self.goal = AgentGoal::direct(goal);
        self
    }

    /// Set the sub-goal only.
    pub fn with_sub_goal(mut self, sub_goal: Vec3) -> Self {
        self.goal.sub_goal = sub_goal;
        self
    }

    /// Set the maximum speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the body radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the coupling capacity.
    pub fn with_coupling(mut self, coupling: Coupling) -> Self {
        self.coupling = coupling;
        self
    }

    /// Set the survival state.
    pub fn with_survival(mut self, survival: u32) -> Self {
        self.survival = survival;
        self
    }

    /// Vector from the committed position to the sub-goal.
    pub fn goal_vector(&self) -> Vec3 {
        self.goal.sub_goal - self.position
    }
}
