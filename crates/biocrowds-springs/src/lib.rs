//! Dynamic spring coupling between agents.
//!
//! Agents that come close enough are linked by damped springs and
//! unlinked again when they drift apart. One tick of the subsystem runs:
//!
//! 1. [`SpringSolver::integrate`]: sub-stepped force integration over the
//!    existing springs, producing the coupled step of every agent
//! 2. [`decouple`]: drop springs whose endpoints moved too far apart
//! 3. [`decide_couplings`]: parallel search for close pairs
//! 4. [`effect_couplings`]: sequential dedup, capacity check and connect
//!
//! Stages 2 and 4 mutate the network and the agents' coupling counts and
//! are strictly sequential. Stages 1 and 3 fan out over rayon.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coupling;
pub mod mass;
pub mod network;
pub mod solver;
pub mod spring;

pub use coupling::{decide_couplings, decouple, effect_couplings, CandidatePair};
pub use mass::MassMap;
pub use network::SpringNetwork;
pub use solver::{SpringIntegration, SpringSolver, VecMap};
pub use spring::{PairKey, Spring, SpringParams};
