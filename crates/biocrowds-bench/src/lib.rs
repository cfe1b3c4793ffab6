//! Benchmark profiles for the BioCrowds crowd engine.
//!
//! - [`reference_profile`]: 1K agents on the default 100 × 50 world
//! - [`dense_profile`]: 4K agents, packed tight enough to couple
//! - [`spawn_crowd`]: deterministic agent placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use biocrowds_core::{AgentId, Crowd, Vec3};
use biocrowds_engine::CrowdConfig;
use biocrowds_springs::MassMap;
use biocrowds_steering::MarkerAssignment;

/// Default world with springs and waypoint cycling on, plus 1K agents.
pub fn reference_profile(seed: u64) -> (CrowdConfig, Crowd) {
    let mut config = CrowdConfig {
        seed,
        waypoint_cycling: true,
        ..CrowdConfig::default()
    };
    config.springs.enabled = true;
    let crowd = spawn_crowd(&config, 1_000, seed);
    (config, crowd)
}

/// Same world with 4K agents and a wider coupling distance.
pub fn dense_profile(seed: u64) -> (CrowdConfig, Crowd) {
    let (mut config, _) = reference_profile(seed);
    config.coupling.distance = 1.5;
    config.coupling.max_couplings = 4;
    let crowd = spawn_crowd(&config, 4_000, seed);
    (config, crowd)
}

/// Place `n` agents at pseudo-random points of the world, each heading
/// for one of the configured waypoints.
pub fn spawn_crowd(config: &CrowdConfig, n: u32, seed: u64) -> Crowd {
    let mut crowd = Crowd::with_capacity(n as usize);
    let mut state = seed.wrapping_add(0x2545_F491_4F6C_DD1D);
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u64 << 24) as f32
    };
    for i in 0..n {
        let p = Vec3::new(next() * config.world.x, 0.0, next() * config.world.z);
        let goal = config
            .waypoints
            .get(i as usize % config.waypoints.len().max(1))
            .copied()
            .unwrap_or(p);
        // Ids are unique by construction.
        let _ = crowd.spawn(config.make_agent(AgentId(i), p).with_goal(goal));
    }
    crowd
}

/// Eight markers per agent on a ring of radius 1, skewed toward the goal.
pub fn ring_markers(crowd: &Crowd) -> MarkerAssignment {
    let mut markers = MarkerAssignment::with_capacity(crowd.len());
    for agent in crowd {
        let ahead = agent.goal_vector().normalize_or_zero() * 0.5;
        for k in 0..8 {
            let a = k as f32 * std::f32::consts::FRAC_PI_4;
            markers.push(agent.id, agent.position + ahead + Vec3::new(a.cos(), 0.0, a.sin()));
        }
    }
    markers
}

/// Every agent at 65 kg.
pub fn masses(crowd: &Crowd) -> MassMap {
    MassMap::uniform(crowd, 65.0)
}
