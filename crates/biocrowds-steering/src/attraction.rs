//! The marker attraction function.

use biocrowds_core::{Vec3, EPSILON};

/// Attraction of one marker for an agent heading along `goal`.
///
/// Markers close to the agent and lying ahead of it towards its sub-goal
/// score highest. Returns 0 when the marker sits on the agent, and a zero
/// goal vector contributes no directional term. Never NaN for finite
/// inputs.
///
/// ```text
/// Y = |marker - agent|
/// F = 1 / (1 + Y) * (1 + ((marker - agent) · goal̂) / Y)
/// ```
pub fn attraction(marker: Vec3, agent: Vec3, goal: Vec3) -> f32 {
    let offset = marker - agent;
    let y = offset.length();
    if y < EPSILON {
        return 0.0;
    }
    let dot = offset.dot(goal.normalize_or_zero());
    (1.0 / (1.0 + y)) * (1.0 + dot / y)
}
