//! Per-tick performance and activity metrics for the crowd engine.
//!
//! [`StepMetrics`] captures stage timings and counters for a single tick.

/// Timing and activity metrics collected during a single tick.
///
/// All durations are in microseconds. The engine fills these in after
/// each successful tick; [`CrowdEngine::last_metrics`] returns the most
/// recent one.
///
/// [`CrowdEngine::last_metrics`]: crate::CrowdEngine::last_metrics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Grid index rebuild.
    pub index_us: u64,
    /// Marker weight aggregation.
    pub weights_us: u64,
    /// Steering vector computation.
    pub steering_us: u64,
    /// Spring force sub-stepping.
    pub springs_us: u64,
    /// Decoupling, coupling decision and effector.
    pub coupling_us: u64,
    /// Fluid blend.
    pub fluid_us: u64,
    /// Position integration and goal refresh.
    pub integrate_us: u64,
    /// Agents in the crowd.
    pub agent_count: usize,
    /// Agents with a positive marker weight this tick.
    pub weighted_agents: usize,
    /// Live springs after the tick.
    pub spring_count: usize,
    /// Springs connected this tick.
    pub springs_created: usize,
    /// Springs removed this tick.
    pub springs_removed: usize,
    /// Candidate pairs emitted by coupling decision.
    pub candidates: usize,
    /// Spring sub-steps run.
    pub sub_steps: u32,
    /// Agents whose step was blended with fluid.
    pub fluid_blended: usize,
    /// Agents given a new sub-goal.
    pub goals_reassigned: usize,
}

impl StepMetrics {
    /// Sum of the per-stage timings, excluding bookkeeping between stages.
    pub fn stage_us(&self) -> u64 {
        self.index_us
            + self.weights_us
            + self.steering_us
            + self.springs_us
            + self.coupling_us
            + self.fluid_us
            + self.integrate_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.stage_us(), 0);
        assert_eq!(m.agent_count, 0);
        assert_eq!(m.spring_count, 0);
        assert_eq!(m.sub_steps, 0);
    }

    #[test]
    fn stage_us_sums_stages() {
        let m = StepMetrics {
            total_us: 100,
            index_us: 10,
            weights_us: 5,
            steering_us: 7,
            springs_us: 20,
            coupling_us: 3,
            fluid_us: 1,
            integrate_us: 4,
            ..Default::default()
        };
        assert_eq!(m.stage_us(), 50);
        assert!(m.stage_us() <= m.total_us);
    }
}
