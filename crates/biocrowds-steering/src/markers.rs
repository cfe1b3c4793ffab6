//! Markers handed to agents by the marker-assignment collaborator.

use biocrowds_core::{AgentId, Vec3};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Marker positions won by one agent.
pub type MarkerSet = SmallVec<[Vec3; 16]>;

/// Agent → marker positions for one tick.
///
/// How markers are distributed is outside the engine. An agent missing
/// from the assignment simply won nothing this tick.
#[derive(Clone, Debug, Default)]
pub struct MarkerAssignment {
    markers: HashMap<AgentId, MarkerSet>,
}

impl MarkerAssignment {
    /// No markers for anyone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sized for `agents` agents.
    pub fn with_capacity(agents: usize) -> Self {
        Self {
            markers: HashMap::with_capacity(agents),
        }
    }

    /// Give `marker` to `agent`.
    pub fn push(&mut self, agent: AgentId, marker: Vec3) {
        self.markers.entry(agent).or_default().push(marker);
    }

    /// Give every marker in `markers` to `agent`.
    pub fn assign<I: IntoIterator<Item = Vec3>>(&mut self, agent: AgentId, markers: I) {
        self.markers.entry(agent).or_default().extend(markers);
    }

    /// Markers won by `agent`, empty if none.
    pub fn get(&self, agent: AgentId) -> &[Vec3] {
        self.markers.get(&agent).map(|m| m.as_slice()).unwrap_or(&[])
    }

    /// Number of agents holding at least one marker entry.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether nobody holds a marker.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Total markers across all agents.
    pub fn marker_count(&self) -> usize {
        self.markers.values().map(|m| m.len()).sum()
    }

    /// Forget every assignment.
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}

impl FromIterator<(AgentId, Vec3)> for MarkerAssignment {
    fn from_iter<I: IntoIterator<Item = (AgentId, Vec3)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (agent, marker) in iter {
            out.push(agent, marker);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_agent_has_no_markers() {
        let m = MarkerAssignment::new();
        assert!(m.get(AgentId(3)).is_empty());
    }

    #[test]
    fn collects_pairs_per_agent() {
        let m: MarkerAssignment = [
            (AgentId(1), Vec3::X),
            (AgentId(2), Vec3::Z),
            (AgentId(1), Vec3::ONE),
        ]
        .into_iter()
        .collect();
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(AgentId(1)), &[Vec3::X, Vec3::ONE]);
        assert_eq!(m.marker_count(), 3);
    }
}
