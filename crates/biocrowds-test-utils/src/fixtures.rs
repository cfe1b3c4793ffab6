//! Crowd, marker and mass fixtures.
//!
//! - [`TestCrowdBuilder`]: agents one at a time with shared defaults.
//! - [`grid_crowd`] / [`lane_crowd`]: regular layouts.
//! - [`coupling_pair`]: two agents a chosen distance apart.
//! - [`scatter_markers`] / [`markers_toward_goals`]: marker assignments.

use biocrowds_core::{Agent, AgentId, Coupling, Crowd, Vec3};
use biocrowds_springs::MassMap;
use biocrowds_steering::MarkerAssignment;

/// Collects agents with common coupling and speed settings.
pub struct TestCrowdBuilder {
    agents: Vec<Agent>,
    coupling: Coupling,
    max_speed: f32,
}

impl TestCrowdBuilder {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            coupling: Coupling::default(),
            max_speed: Agent::DEFAULT_MAX_SPEED,
        }
    }

    /// Coupling capacity given to agents added after this call.
    pub fn coupling(mut self, max_couplings: u32, distance: f32) -> Self {
        self.coupling = Coupling::new(max_couplings, distance);
        self
    }

    /// Max speed given to agents added after this call.
    pub fn max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Add an agent with the next free id.
    pub fn agent(mut self, position: Vec3, goal: Vec3) -> Self {
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(
            Agent::new(id, position)
                .with_goal(goal)
                .with_coupling(self.coupling)
                .with_max_speed(self.max_speed),
        );
        self
    }

    /// Add a fully built agent.
    pub fn push(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Finish. Panics on duplicate ids.
    pub fn build(self) -> Crowd {
        Crowd::from_agents(self.agents).expect("fixture ids are unique")
    }
}

impl Default for TestCrowdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `rows × cols` agents `spacing` apart starting at `origin`, ids in
/// row-major order, each heading `+x` by 10 units.
pub fn grid_crowd(rows: u32, cols: u32, spacing: f32, origin: Vec3) -> Crowd {
    let mut b = TestCrowdBuilder::new();
    for r in 0..rows {
        for c in 0..cols {
            let p = origin + Vec3::new(c as f32 * spacing, 0.0, r as f32 * spacing);
            b = b.agent(p, p + Vec3::new(10.0, 0.0, 0.0));
        }
    }
    b.build()
}

/// `n` agents on the line `z = z`, `spacing` apart from `x = 1`, all
/// heading for `(goal_x, 0, z)`.
pub fn lane_crowd(n: u32, spacing: f32, z: f32, goal_x: f32) -> Crowd {
    let mut b = TestCrowdBuilder::new();
    for i in 0..n {
        b = b.agent(
            Vec3::new(1.0 + i as f32 * spacing, 0.0, z),
            Vec3::new(goal_x, 0.0, z),
        );
    }
    b.build()
}

/// Two agents `distance` apart along x with coupling distance
/// `coupling_distance` and capacity 2.
pub fn coupling_pair(distance: f32, coupling_distance: f32) -> Crowd {
    let a = Vec3::new(10.0, 0.0, 10.0);
    TestCrowdBuilder::new()
        .coupling(2, coupling_distance)
        .agent(a, a)
        .agent(a + Vec3::new(distance, 0.0, 0.0), a)
        .build()
}

/// `per_agent` markers around each agent within `radius`, from a fixed
/// integer hash of `seed`, agent id and marker index.
pub fn scatter_markers(crowd: &Crowd, per_agent: usize, radius: f32, seed: u64) -> MarkerAssignment {
    let mut markers = MarkerAssignment::with_capacity(crowd.len());
    for agent in crowd {
        for i in 0..per_agent {
            let h = mix(seed ^ (u64::from(agent.id.0) << 20) ^ i as u64);
            let dx = unit(h) * 2.0 - 1.0;
            let dz = unit(h >> 24) * 2.0 - 1.0;
            markers.push(agent.id, agent.position + Vec3::new(dx, 0.0, dz) * radius);
        }
    }
    markers
}

/// `per_agent` markers per agent spread along the segment from the agent
/// halfway to `radius` toward its sub-goal.
pub fn markers_toward_goals(crowd: &Crowd, per_agent: usize, radius: f32) -> MarkerAssignment {
    let mut markers = MarkerAssignment::with_capacity(crowd.len());
    for agent in crowd {
        let dir = agent.goal_vector().normalize_or_zero();
        for i in 0..per_agent {
            let t = (i + 1) as f32 / per_agent as f32;
            markers.push(agent.id, agent.position + dir * radius * t);
        }
    }
    markers
}

/// Every agent in `crowd` with mass `mass`.
pub fn uniform_masses(crowd: &Crowd, mass: f32) -> MassMap {
    MassMap::uniform(crowd, mass)
}

fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

fn unit(h: u64) -> f32 {
    (h & 0xFF_FFFF) as f32 / 0x100_0000 as f32
}
