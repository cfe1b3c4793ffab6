//! Agent masses supplied before force integration.

use biocrowds_core::{AgentId, Crowd, StageError};
use std::collections::HashMap;

/// Agent → mass in kg.
///
/// Filled by whoever owns the agents' physical model. A lookup that
/// misses is an error, never a silent zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MassMap {
    masses: HashMap<AgentId, f32>,
}

impl MassMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every agent of `crowd` weighs `mass`.
    pub fn uniform(crowd: &Crowd, mass: f32) -> Self {
        Self {
            masses: crowd.ids().map(|id| (id, mass)).collect(),
        }
    }

    /// Set the mass of one agent.
    pub fn insert(&mut self, id: AgentId, mass: f32) {
        self.masses.insert(id, mass);
    }

    /// Raw lookup.
    pub fn get(&self, id: AgentId) -> Option<f32> {
        self.masses.get(&id).copied()
    }

    /// Mass of `id`, rejecting missing entries and non-positive or
    /// non-finite values.
    pub fn require(&self, id: AgentId) -> Result<f32, StageError> {
        let mass = self
            .get(id)
            .ok_or(StageError::MissingMass { agent: id })?;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(StageError::InvalidMass { agent: id, mass });
        }
        Ok(mass)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

impl FromIterator<(AgentId, f32)> for MassMap {
    fn from_iter<I: IntoIterator<Item = (AgentId, f32)>>(iter: I) -> Self {
        Self {
            masses: iter.into_iter().collect(),
        }
    }
}
