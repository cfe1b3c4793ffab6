//! Per-agent total marker weight.

use crate::attraction::attraction;
use crate::markers::MarkerAssignment;
use biocrowds_core::{Agent, AgentId, EPSILON};
use dashmap::DashMap;
use rayon::prelude::*;
use tracing::trace;

/// Room reserved per agent when the map is reallocated.
const WEIGHT_SLACK: usize = 2;

/// Sum of marker attraction per agent, rebuilt every tick.
///
/// Agents that won no markers, or whose markers all score zero, get no
/// entry. Readers must treat a missing entry as "no steering this tick".
/// The map persists across ticks and is only reallocated when the crowd
/// outgrows it.
#[derive(Debug, Default)]
pub struct MarkerWeights {
    totals: DashMap<AgentId, f32>,
    reallocations: usize,
}

impl MarkerWeights {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map pre-sized for `agents` agents.
    pub fn with_capacity(agents: usize) -> Self {
        Self {
            totals: DashMap::with_capacity(agents * WEIGHT_SLACK),
            reallocations: 0,
        }
    }

    /// Recompute every agent's total from its assigned markers.
    ///
    /// Returns the number of agents that received a weight.
    pub fn compute(&mut self, agents: &[Agent], markers: &MarkerAssignment) -> usize {
        if self.totals.capacity() < agents.len() * WEIGHT_SLACK {
            self.totals = DashMap::with_capacity(agents.len() * WEIGHT_SLACK);
            self.reallocations += 1;
        } else {
            self.totals.clear();
        }

        let totals = &self.totals;
        agents.par_iter().for_each(|agent| {
            let assigned = markers.get(agent.id);
            if assigned.is_empty() {
                return;
            }
            let goal = agent.goal_vector();
            let total: f32 = assigned
                .iter()
                .map(|&m| attraction(m, agent.position, goal))
                .sum();
            if total >= EPSILON {
                totals.insert(agent.id, total);
            }
        });

        trace!(weighted = totals.len(), agents = agents.len(), "marker weights");
        totals.len()
    }

    /// Total weight of `agent`, if it has one this tick.
    pub fn get(&self, agent: AgentId) -> Option<f32> {
        self.totals.get(&agent).map(|w| *w.value())
    }

    /// Number of weighted agents.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether no agent is weighted.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// How many times the map was reallocated for a larger crowd.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biocrowds_core::Vec3;

    #[test]
    fn totals_sum_attraction() {
        let agents = vec![Agent::new(AgentId(0), Vec3::ZERO).with_goal(Vec3::new(10.0, 0.0, 0.0))];
        let mut markers = MarkerAssignment::new();
        markers.assign(
            AgentId(0),
            [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 3.0)],
        );
        let mut w = MarkerWeights::new();
        assert_eq!(w.compute(&agents, &markers), 1);
        // 1.0 for the marker straight ahead, 0.25 for the one off to the side.
        assert!((w.get(AgentId(0)).unwrap() - 1.25).abs() < 1e-6);
    }

    #[test]
    fn agents_without_markers_get_no_entry() {
        let agents = vec![
            Agent::new(AgentId(0), Vec3::ZERO),
            Agent::new(AgentId(1), Vec3::ONE),
        ];
        let mut markers = MarkerAssignment::new();
        markers.push(AgentId(1), Vec3::new(2.0, 1.0, 1.0));
        let mut w = MarkerWeights::new();
        w.compute(&agents, &markers);
        assert_eq!(w.get(AgentId(0)), None);
        assert!(w.get(AgentId(1)).is_some());
    }

    #[test]
    fn markers_all_behind_count_as_none() {
        let agents = vec![Agent::new(AgentId(0), Vec3::ZERO).with_goal(Vec3::X)];
        let mut markers = MarkerAssignment::new();
        markers.push(AgentId(0), Vec3::new(-2.0, 0.0, 0.0));
        let mut w = MarkerWeights::new();
        assert_eq!(w.compute(&agents, &markers), 0);
        assert!(w.is_empty());
    }

    #[test]
    fn previous_tick_is_cleared() {
        let agents = vec![Agent::new(AgentId(0), Vec3::ZERO)];
        let mut markers = MarkerAssignment::new();
        markers.push(AgentId(0), Vec3::X);
        let mut w = MarkerWeights::with_capacity(1);
        w.compute(&agents, &markers);
        assert_eq!(w.len(), 1);
        w.compute(&agents, &MarkerAssignment::new());
        assert!(w.is_empty());
        assert_eq!(w.reallocations(), 0);
    }
}
