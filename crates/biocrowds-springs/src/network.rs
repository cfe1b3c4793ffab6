//! The live spring list.

use crate::spring::{PairKey, Spring};
use biocrowds_core::{AgentId, StageError};
use indexmap::IndexMap;

/// Springs keyed by their unordered endpoint pair.
///
/// At most one spring exists per pair. Order carries no meaning, so
/// removal is swap-remove. The network has a fixed capacity: a connect
/// that would exceed it is an error rather than a silent drop, because a
/// dropped spring whose endpoints were already counted would corrupt the
/// coupling counts.
#[derive(Clone, Debug, Default)]
pub struct SpringNetwork {
    springs: IndexMap<PairKey, Spring>,
    capacity: usize,
}

impl SpringNetwork {
    /// An empty network holding at most `capacity` springs.
    pub fn new(capacity: usize) -> Self {
        Self {
            springs: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of live springs.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raise the capacity to at least `capacity`. Never lowers it.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.springs.reserve(capacity - self.springs.len());
            self.capacity = capacity;
        }
    }

    /// Number of live springs.
    pub fn len(&self) -> usize {
        self.springs.len()
    }

    /// Whether no spring is live.
    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    /// Whether `a` and `b` are linked.
    pub fn contains(&self, a: AgentId, b: AgentId) -> bool {
        self.springs.contains_key(&PairKey::new(a, b))
    }

    /// Add `spring`.
    ///
    /// Returns `Ok(false)` if its pair is already linked and
    /// `Err(StageError::SpringCapacityExceeded)` if the network is full.
    pub fn connect(&mut self, spring: Spring) -> Result<bool, StageError> {
        let key = spring.key();
        if self.springs.contains_key(&key) {
            return Ok(false);
        }
        if self.springs.len() >= self.capacity {
            return Err(StageError::SpringCapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.springs.insert(key, spring);
        Ok(true)
    }

    /// Remove the spring at `index` by swapping the last one into its place.
    pub fn swap_remove_index(&mut self, index: usize) -> Option<Spring> {
        self.springs.swap_remove_index(index).map(|(_, s)| s)
    }

    /// Spring at `index`.
    pub fn get_index(&self, index: usize) -> Option<&Spring> {
        self.springs.get_index(index).map(|(_, s)| s)
    }

    /// Live springs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Spring> + '_ {
        self.springs.values()
    }

    /// Live springs, for parallel passes.
    pub fn springs(&self) -> &IndexMap<PairKey, Spring> {
        &self.springs
    }

    /// Number of springs touching `id`.
    pub fn degree(&self, id: AgentId) -> usize {
        self.springs.keys().filter(|k| k.touches(id)).count()
    }

    /// A copy of the live springs, e.g. for logging.
    pub fn to_vec(&self) -> Vec<Spring> {
        self.springs.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spring::SpringParams;

    fn spring(a: u32, b: u32) -> Spring {
        Spring::new(AgentId(a), AgentId(b), &SpringParams::default())
    }

    #[test]
    fn duplicate_pairs_are_rejected_either_way_round() {
        let mut net = SpringNetwork::new(4);
        assert_eq!(net.connect(spring(1, 2)), Ok(true));
        assert_eq!(net.connect(spring(2, 1)), Ok(false));
        assert_eq!(net.len(), 1);
        assert!(net.contains(AgentId(2), AgentId(1)));
    }

    #[test]
    fn full_network_fails_loudly() {
        let mut net = SpringNetwork::new(1);
        net.connect(spring(0, 1)).unwrap();
        assert_eq!(
            net.connect(spring(0, 2)),
            Err(StageError::SpringCapacityExceeded { capacity: 1 })
        );
        // A duplicate of a live spring is still just a no-op.
        assert_eq!(net.connect(spring(1, 0)), Ok(false));
    }

    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut net = SpringNetwork::new(8);
        for (a, b) in [(0, 1), (1, 2), (2, 3)] {
            net.connect(spring(a, b)).unwrap();
        }
        let removed = net.swap_remove_index(0).unwrap();
        assert_eq!(removed.key(), PairKey::new(AgentId(0), AgentId(1)));
        assert_eq!(net.get_index(0).unwrap().key(), PairKey::new(AgentId(2), AgentId(3)));
        assert_eq!(net.degree(AgentId(2)), 2);
        assert_eq!(net.degree(AgentId(0)), 0);
    }

    #[test]
    fn capacity_only_grows() {
        let mut net = SpringNetwork::new(4);
        net.ensure_capacity(2);
        assert_eq!(net.capacity(), 4);
        net.ensure_capacity(10);
        assert_eq!(net.capacity(), 10);
    }
}
