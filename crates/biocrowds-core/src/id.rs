//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an agent for the lifetime of a run.
///
/// Assigned at spawn time and never reused. Every per-agent map in the
/// engine (positions, steps, masses, force buckets) is keyed by this id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation commits one step. A locked or
/// aborted tick does not advance it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_orders_numerically() {
        let mut ids = vec![AgentId(7), AgentId(2), AgentId(5)];
        ids.sort();
        assert_eq!(ids, vec![AgentId(2), AgentId(5), AgentId(7)]);
    }

    #[test]
    fn tick_next_increments() {
        assert_eq!(TickId(41).next(), TickId(42));
        assert_eq!(TickId::default(), TickId(0));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(AgentId(3).to_string(), "3");
        assert_eq!(TickId(12).to_string(), "12");
    }
}
