//! Test fixtures for BioCrowds development.
//!
//! Builders for small crowds in known layouts, deterministic marker
//! scatters and mass maps, shared by the integration tests and benches.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    coupling_pair, grid_crowd, lane_crowd, markers_toward_goals, scatter_markers, uniform_masses,
    TestCrowdBuilder,
};
