//! Error types shared across the BioCrowds workspace.
//!
//! Organized by layer: crowd bookkeeping, a single stage inside a tick,
//! and the tick as a whole.

use crate::id::AgentId;
use thiserror::Error;

/// Errors from the agent store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CrowdError {
    /// An agent with this id was already spawned.
    #[error("agent {id} already exists")]
    DuplicateAgent {
        /// The conflicting id.
        id: AgentId,
    },
    /// No agent with this id exists.
    #[error("agent {id} does not exist")]
    UnknownAgent {
        /// The missing id.
        id: AgentId,
    },
}

/// Errors raised by one stage of the tick pipeline.
///
/// Wrapped in [`StepError::StageFailed`] by the tick driver.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StageError {
    /// The mass map has no entry for an agent that received spring forces.
    #[error("no mass supplied for agent {agent}")]
    MissingMass {
        /// The agent whose mass lookup missed.
        agent: AgentId,
    },
    /// The supplied mass is zero, negative or not finite.
    #[error("agent {agent} has invalid mass {mass}")]
    InvalidMass {
        /// The offending agent.
        agent: AgentId,
        /// The rejected mass value.
        mass: f32,
    },
    /// Springs are enabled and exist but no mass map was provided.
    #[error("spring integration requires a mass map")]
    MassMapUnavailable,
    /// The spring network is full and a new connection would be dropped.
    #[error("spring network capacity {capacity} exceeded")]
    SpringCapacityExceeded {
        /// Configured maximum number of live springs.
        capacity: usize,
    },
    /// A stage referenced an agent that is not in the crowd.
    #[error("stage referenced unknown agent {id}")]
    UnknownAgent {
        /// The missing id.
        id: AgentId,
    },
}

/// Errors from the tick engine during `execute_tick()`.
///
/// A failed tick commits nothing: positions, goals and the tick counter
/// keep their pre-tick values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StepError {
    /// A stage returned an error.
    #[error("stage '{stage}' failed: {reason}")]
    StageFailed {
        /// Name of the failing stage.
        stage: &'static str,
        /// The underlying stage error.
        #[source]
        reason: StageError,
    },
}
