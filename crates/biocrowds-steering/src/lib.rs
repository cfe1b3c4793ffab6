//! Marker-based steering for BioCrowds.
//!
//! Each tick an external collaborator hands every agent the marker
//! positions it won. This crate turns those markers into a bounded step
//! and commits it:
//!
//! 1. [`MarkerWeights::compute`]: per-agent total attraction
//! 2. [`compute_steps`]: weighted pull towards markers, capped at max speed
//! 3. [`FluidField::apply`] (optional): blend an external momentum field
//! 4. [`integrate_positions`]: move, clamp to the world, cycle waypoints

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attraction;
pub mod fluid;
pub mod integrate;
pub mod markers;
pub mod steer;
pub mod weights;

pub use attraction::attraction;
pub use fluid::{FluidField, FluidParams, FluidParticle, FluidSample};
pub use integrate::{integrate_positions, GoalPolicy, Waypoints};
pub use markers::MarkerAssignment;
pub use steer::{compute_steps, StepMap};
pub use weights::MarkerWeights;
