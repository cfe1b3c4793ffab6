//! Connect and disconnect transitions.

use crate::network::SpringNetwork;
use crate::spring::{Spring, SpringParams};
use biocrowds_core::{Agent, AgentId, Crowd, StageError};
use biocrowds_space::GridIndex;
use crossbeam_channel::unbounded;
use rayon::prelude::*;
use tracing::trace;

/// A pair found close enough to couple: `(from, to)`.
pub type CandidatePair = (AgentId, AgentId);

/// Distance under which two agents count as coupled. Symmetric in the pair.
fn pair_distance(a: &Agent, b: &Agent) -> f32 {
    a.coupling.distance.min(b.coupling.distance)
}

/// Find every pair of living agents close enough to couple.
///
/// Read-only and parallel: each agent with nonzero survival scans the
/// agents indexed under its home cell and sends `(self, other)` down a
/// channel when the other lies under the pair's coupling distance. Both
/// orientations of a pair are usually reported; the effector dedups.
///
/// The drained candidates are sorted, so what the effector sees does not
/// depend on worker interleaving.
pub fn decide_couplings(crowd: &Crowd, index: &GridIndex) -> Vec<CandidatePair> {
    let (tx, rx) = unbounded();

    crowd
        .as_slice()
        .par_iter()
        .filter(|agent| agent.survival != 0)
        .for_each_with(tx, |tx, agent| {
            for other_id in index.neighbours(agent.id) {
                let (Some(other), Some(other_pos)) =
                    (crowd.get(other_id), index.position(other_id))
                else {
                    continue;
                };
                if agent.position.distance(other_pos) < pair_distance(agent, other) {
                    // The receiver outlives every sender.
                    let _ = tx.send((agent.id, other_id));
                }
            }
        });

    let mut candidates: Vec<CandidatePair> = rx.try_iter().collect();
    candidates.sort_unstable();
    trace!(candidates = candidates.len(), "coupling decision");
    candidates
}

/// Turn candidates into springs.
///
/// Sequential. A candidate is skipped if its pair is already linked or
/// either endpoint is at capacity; otherwise a spring with `params` is
/// added and both endpoints' counts go up by one.
///
/// Returns the number of springs created. Fails if an endpoint is not in
/// the crowd or the network is full.
pub fn effect_couplings(
    crowd: &mut Crowd,
    network: &mut SpringNetwork,
    candidates: &[CandidatePair],
    params: &SpringParams,
) -> Result<usize, StageError> {
    let mut created = 0;
    for &(a, b) in candidates {
        if a == b || network.contains(a, b) {
            continue;
        }
        let slot_a = crowd.slot_of(a).ok_or(StageError::UnknownAgent { id: a })?;
        let slot_b = crowd.slot_of(b).ok_or(StageError::UnknownAgent { id: b })?;
        let agents = crowd.as_mut_slice();
        if !(agents[slot_a].coupling.has_capacity() && agents[slot_b].coupling.has_capacity()) {
            continue;
        }
        if network.connect(Spring::new(a, b, params))? {
            agents[slot_a].coupling.current += 1;
            agents[slot_b].coupling.current += 1;
            created += 1;
        }
    }
    trace!(created, live = network.len(), "coupling effector");
    Ok(created)
}

/// Remove springs whose endpoints drifted past the pair's coupling distance.
///
/// Sequential, reads committed positions. A removed slot is refilled by
/// the last spring and re-examined, so nothing is skipped. Idempotent:
/// with no movement in between, a second run removes nothing.
///
/// Returns the number of springs removed.
pub fn decouple(crowd: &mut Crowd, network: &mut SpringNetwork) -> Result<usize, StageError> {
    let mut removed = 0;
    let mut i = 0;
    while let Some(spring) = network.get_index(i).copied() {
        let slot_a = crowd
            .slot_of(spring.a)
            .ok_or(StageError::UnknownAgent { id: spring.a })?;
        let slot_b = crowd
            .slot_of(spring.b)
            .ok_or(StageError::UnknownAgent { id: spring.b })?;
        let agents = crowd.as_mut_slice();
        let (a, b) = (&agents[slot_a], &agents[slot_b]);

        if a.position.distance(b.position) > pair_distance(a, b) {
            network.swap_remove_index(i);
            for slot in [slot_a, slot_b] {
                let c = &mut agents[slot].coupling;
                debug_assert!(c.current > 0, "live spring on agent with no couplings");
                c.current -= 1;
            }
            removed += 1;
        } else {
            i += 1;
        }
    }
    trace!(removed, live = network.len(), "decoupling");
    Ok(removed)
}
