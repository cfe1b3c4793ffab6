//! Position integration and waypoint cycling.

use biocrowds_core::{Agent, TickId, Vec3, WorldExtent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// A non-empty set of points agents may be sent to when a sub-goal is reached.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoints {
    points: Vec<Vec3>,
}

impl Waypoints {
    /// Returns `None` if `points` is empty.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    /// Draw one point uniformly.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        self.points[rng.gen_range(0..self.points.len())]
    }

    /// Whether `p` is one of the configured points.
    pub fn contains(&self, p: Vec3) -> bool {
        self.points.contains(&p)
    }

    /// The configured points.
    pub fn as_slice(&self) -> &[Vec3] {
        &self.points
    }
}

/// How sub-goals are refreshed after an agent moves.
#[derive(Clone, Debug)]
pub struct GoalPolicy {
    /// Waypoints to cycle through, or `None` to leave sub-goals alone.
    pub waypoints: Option<Waypoints>,
    /// Distance at which a sub-goal counts as reached.
    pub reached_distance: f32,
    /// Run seed for waypoint draws.
    pub seed: u64,
}

impl GoalPolicy {
    /// Never reassign sub-goals.
    pub fn fixed() -> Self {
        Self {
            waypoints: None,
            reached_distance: 1.0,
            seed: 0,
        }
    }

    /// Reassign from `waypoints` once within `reached_distance`.
    pub fn cycling(waypoints: Waypoints, reached_distance: f32, seed: u64) -> Self {
        Self {
            waypoints: Some(waypoints),
            reached_distance,
            seed,
        }
    }
}

/// Commit each agent's step, clamp to the world and refresh reached sub-goals.
///
/// Each axis is clamped on its own, so a step that would leave the world
/// lands exactly on the boundary. Waypoint draws come from a ChaCha8
/// stream seeded by the run seed XOR the tick, one stream per agent id,
/// so the outcome does not depend on thread scheduling.
///
/// Returns the number of agents given a new sub-goal.
pub fn integrate_positions(
    agents: &mut [Agent],
    extent: WorldExtent,
    policy: &GoalPolicy,
    tick: TickId,
) -> usize {
    agents
        .par_iter_mut()
        .map(|agent| {
            agent.position = extent.clamp(agent.position + agent.step);

            let Some(waypoints) = policy.waypoints.as_ref() else {
                return false;
            };
            if agent.position.distance(agent.goal.sub_goal) > policy.reached_distance {
                return false;
            }
            let mut rng = ChaCha8Rng::seed_from_u64(policy.seed ^ tick.0);
            rng.set_stream(u64::from(agent.id.0));
            agent.goal.sub_goal = waypoints.choose(&mut rng);
            true
        })
        .filter(|&reassigned| reassigned)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use biocrowds_core::AgentId;
    use proptest::prelude::*;

    fn waypoints() -> Waypoints {
        Waypoints::new(vec![
            Vec3::new(25.0, 0.0, 25.0),
            Vec3::new(45.0, 0.0, 25.0),
            Vec3::new(25.0, 0.0, 45.0),
        ])
        .unwrap()
    }

    #[test]
    fn empty_waypoints_rejected() {
        assert!(Waypoints::new(Vec::new()).is_none());
    }

    #[test]
    fn step_is_applied() {
        let mut agents = vec![Agent::new(AgentId(0), Vec3::new(5.0, 0.0, 5.0))];
        agents[0].step = Vec3::new(1.0, 0.0, -0.5);
        integrate_positions(&mut agents, WorldExtent::default(), &GoalPolicy::fixed(), TickId(0));
        assert_eq!(agents[0].position, Vec3::new(6.0, 0.0, 4.5));
    }

    #[test]
    fn reached_sub_goal_draws_from_waypoints() {
        let mut agents = vec![Agent::new(AgentId(7), Vec3::new(10.0, 0.0, 10.0))
            .with_goal(Vec3::new(90.0, 0.0, 40.0))
            .with_sub_goal(Vec3::new(10.5, 0.0, 10.0))];
        let policy = GoalPolicy::cycling(waypoints(), 1.0, 42);
        let n = integrate_positions(&mut agents, WorldExtent::default(), &policy, TickId(3));
        assert_eq!(n, 1);
        assert!(policy.waypoints.as_ref().unwrap().contains(agents[0].goal.sub_goal));
        assert_eq!(agents[0].goal.end_goal, Vec3::new(90.0, 0.0, 40.0));
    }

    #[test]
    fn cycling_off_keeps_sub_goal() {
        let sub = Vec3::new(10.5, 0.0, 10.0);
        let mut agents = vec![Agent::new(AgentId(0), Vec3::new(10.0, 0.0, 10.0)).with_sub_goal(sub)];
        let n = integrate_positions(&mut agents, WorldExtent::default(), &GoalPolicy::fixed(), TickId(0));
        assert_eq!(n, 0);
        assert_eq!(agents[0].goal.sub_goal, sub);
    }

    #[test]
    fn draws_are_reproducible() {
        let make = || {
            (0..32)
                .map(|i| {
                    Agent::new(AgentId(i), Vec3::new(1.0, 0.0, 1.0)).with_sub_goal(Vec3::new(1.0, 0.0, 1.0))
                })
                .collect::<Vec<_>>()
        };
        let policy = GoalPolicy::cycling(waypoints(), 1.0, 9);
        let mut a = make();
        let mut b = make();
        integrate_positions(&mut a, WorldExtent::default(), &policy, TickId(5));
        integrate_positions(&mut b, WorldExtent::default(), &policy, TickId(5));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn committed_positions_stay_in_world(
            px in 0.0f32..100.0, pz in 0.0f32..50.0,
            sx in -200.0f32..200.0, sz in -200.0f32..200.0,
        ) {
            let extent = WorldExtent::new(100.0, 50.0);
            let mut agents = vec![Agent::new(AgentId(0), Vec3::new(px, 0.0, pz))];
            agents[0].step = Vec3::new(sx, 0.0, sz);
            integrate_positions(&mut agents, extent, &GoalPolicy::fixed(), TickId(0));
            let p = agents[0].position;
            prop_assert!(extent.contains(p));
            if px + sx > 100.0 { prop_assert_eq!(p.x, 100.0); }
            if px + sx < 0.0 { prop_assert_eq!(p.x, 0.0); }
            if pz + sz > 50.0 { prop_assert_eq!(p.z, 50.0); }
            if pz + sz < 0.0 { prop_assert_eq!(p.z, 0.0); }
        }

        #[test]
        fn new_sub_goal_always_in_set(seed in any::<u64>(), tick in 0u64..1000, id in 0u32..1000) {
            let policy = GoalPolicy::cycling(waypoints(), 1.0, seed);
            let mut agents = vec![Agent::new(AgentId(id), Vec3::new(3.0, 0.0, 3.0))];
            integrate_positions(&mut agents, WorldExtent::default(), &policy, TickId(tick));
            prop_assert!(policy.waypoints.as_ref().unwrap().contains(agents[0].goal.sub_goal));
        }
    }
}
