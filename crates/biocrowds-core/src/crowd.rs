//! Id-indexed storage for the agents of one run.

use crate::agent::Agent;
use crate::error::CrowdError;
use crate::id::AgentId;
use indexmap::IndexMap;

/// The agents of a run, stored densely in spawn order.
///
/// Crowd size is fixed once the run starts: agents are spawned, never
/// removed, so the slot of an agent never changes. Iteration order is
/// spawn order, which keeps every per-tick pass deterministic.
#[derive(Clone, Debug, Default)]
pub struct Crowd {
    agents: Vec<Agent>,
    slots: IndexMap<AgentId, usize>,
}

impl Crowd {
    /// An empty crowd.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty crowd with room for `n` agents.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            agents: Vec::with_capacity(n),
            slots: IndexMap::with_capacity(n),
        }
    }

    /// Build a crowd from agents in spawn order.
    pub fn from_agents<I>(agents: I) -> Result<Self, CrowdError>
    where
        I: IntoIterator<Item = Agent>,
    {
        let mut crowd = Self::new();
        for agent in agents {
            crowd.spawn(agent)?;
        }
        Ok(crowd)
    }

    /// Add an agent. Fails if its id is already taken.
    pub fn spawn(&mut self, agent: Agent) -> Result<(), CrowdError> {
        if self.slots.contains_key(&agent.id) {
            return Err(CrowdError::DuplicateAgent { id: agent.id });
        }
        self.slots.insert(agent.id, self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the crowd has no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Dense slot of `id`, if spawned.
    pub fn slot_of(&self, id: AgentId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Look up an agent.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slot_of(id).map(|s| &self.agents[s])
    }

    /// Look up an agent mutably.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let slot = self.slot_of(id)?;
        self.agents.get_mut(slot)
    }

    /// Like [`Crowd::get`] but reports a missing id as an error.
    pub fn try_get(&self, id: AgentId) -> Result<&Agent, CrowdError> {
        self.get(id).ok_or(CrowdError::UnknownAgent { id })
    }

    /// Whether `id` is spawned.
    pub fn contains(&self, id: AgentId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Agents in spawn order.
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    /// Ids in spawn order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.slots.keys().copied()
    }

    /// All agents as a slice, in spawn order.
    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    /// All agents as a mutable slice. Ids must not be changed through it.
    pub fn as_mut_slice(&mut self) -> &mut [Agent] {
        &mut self.agents
    }
}

impl<'a> IntoIterator for &'a Crowd {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
