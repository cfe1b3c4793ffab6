//! Core types and errors for the BioCrowds crowd simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: agent
//! identifiers, the [`Agent`] record and its coupling state, the
//! id-indexed [`Crowd`] store, the world rectangle, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod crowd;
pub mod error;
pub mod id;
pub mod world;

pub use agent::{Agent, AgentGoal, Coupling};
pub use crowd::Crowd;
pub use error::{CrowdError, StageError, StepError};
pub use id::{AgentId, TickId};
pub use world::WorldExtent;

/// Three-component vector used for positions, steps and forces.
///
/// Positions live on the ground plane: `y` is carried through but never
/// driven by the steering model.
pub use glam::Vec3;

/// Distance below which two points are treated as coincident.
pub const EPSILON: f32 = 1e-5;
