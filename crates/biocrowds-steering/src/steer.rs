//! Steering vector computation.

use crate::attraction::attraction;
use crate::markers::MarkerAssignment;
use crate::weights::MarkerWeights;
use biocrowds_core::{Agent, AgentId, Vec3, EPSILON};
use rayon::prelude::*;
use std::collections::HashMap;
use std::f32::consts::PI;

/// Agent → step for every agent in the crowd.
pub type StepMap = HashMap<AgentId, Vec3>;

/// Compute and store each agent's step for this tick.
///
/// Agents with a total weight are pulled towards their markers, each
/// marker contributing in proportion to its share of the total. The raw
/// pull is scaled by π and capped at the agent's max speed. Agents with
/// no weight get a zero step.
///
/// Returns a copy of every agent's new step, keyed by id, for the spring
/// stage to use as the pre-coupling velocity.
pub fn compute_steps(
    agents: &mut [Agent],
    markers: &MarkerAssignment,
    weights: &MarkerWeights,
) -> StepMap {
    agents
        .par_iter_mut()
        .map(|agent| {
            agent.step = match weights.get(agent.id) {
                Some(total) => steer(agent, markers.get(agent.id), total),
                // No markers, no pull: an unweighted agent stands still this
                // tick rather than repeating last tick's step.
                None => Vec3::ZERO,
            };
            (agent.id, agent.step)
        })
        .collect()
}

fn steer(agent: &Agent, markers: &[Vec3], total_weight: f32) -> Vec3 {
    let goal = agent.goal_vector();
    let direction: Vec3 = markers
        .iter()
        .map(|&m| {
            let share = attraction(m, agent.position, goal) / total_weight;
            share * agent.max_speed * (m - agent.position)
        })
        .sum();

    let magnitude = direction.length();
    if magnitude > EPSILON {
        let speed = (magnitude * PI).min(agent.max_speed);
        speed * (direction / magnitude)
    } else {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(agents: &mut [Agent], markers: &MarkerAssignment) -> StepMap {
        let mut w = MarkerWeights::new();
        w.compute(agents, markers);
        compute_steps(agents, markers, &w)
    }

    #[test]
    fn no_markers_means_zero_step() {
        let mut agents = vec![Agent::new(AgentId(0), Vec3::ZERO)];
        agents[0].step = Vec3::X;
        let steps = run(&mut agents, &MarkerAssignment::new());
        assert_eq!(agents[0].step, Vec3::ZERO);
        assert_eq!(steps[&AgentId(0)], Vec3::ZERO);
    }

    #[test]
    fn single_marker_ahead_moves_at_max_speed() {
        let mut agents =
            vec![Agent::new(AgentId(0), Vec3::ZERO).with_goal(Vec3::new(10.0, 0.0, 0.0))];
        let mut markers = MarkerAssignment::new();
        markers.push(AgentId(0), Vec3::new(1.0, 0.0, 0.0));
        run(&mut agents, &markers);
        let step = agents[0].step;
        assert!((step.length() - Agent::DEFAULT_MAX_SPEED).abs() < 1e-5);
        assert!(step.x > 0.0);
        assert!(step.z.abs() < 1e-6);
    }

    #[test]
    fn short_pull_is_scaled_by_pi() {
        let mut agents = vec![Agent::new(AgentId(0), Vec3::ZERO)
            .with_goal(Vec3::new(10.0, 0.0, 0.0))
            .with_max_speed(1.0)];
        let mut markers = MarkerAssignment::new();
        markers.push(AgentId(0), Vec3::new(0.1, 0.0, 0.0));
        run(&mut agents, &markers);
        // One marker takes the whole share: direction = 1.0 * 1.0 * 0.1.
        assert!((agents[0].step.x - 0.1 * PI).abs() < 1e-5);
    }

    #[test]
    fn shadow_map_covers_every_agent() {
        let mut agents: Vec<_> = (0..5)
            .map(|i| Agent::new(AgentId(i), Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        let mut markers = MarkerAssignment::new();
        markers.push(AgentId(2), Vec3::new(2.0, 0.0, 1.0));
        let steps = run(&mut agents, &markers);
        assert_eq!(steps.len(), 5);
        for a in &agents {
            assert_eq!(steps[&a.id], a.step);
        }
    }

    proptest! {
        #[test]
        fn step_never_exceeds_max_speed(
            markers in prop::collection::vec((-3.0f32..3.0, -3.0f32..3.0), 1..12),
            gx in -20.0f32..20.0,
            gz in -20.0f32..20.0,
            max_speed in 0.1f32..3.0,
        ) {
            let mut agents = vec![Agent::new(AgentId(0), Vec3::new(10.0, 0.0, 10.0))
                .with_goal(Vec3::new(gx, 0.0, gz))
                .with_max_speed(max_speed)];
            let mut assignment = MarkerAssignment::new();
            for (dx, dz) in markers {
                assignment.push(AgentId(0), Vec3::new(10.0 + dx, 0.0, 10.0 + dz));
            }
            run(&mut agents, &assignment);
            let step = agents[0].step;
            prop_assert!(step.is_finite());
            prop_assert!(step.length() <= max_speed * (1.0 + 1e-5));
            prop_assert_eq!(step.y, 0.0);
        }
    }
}
