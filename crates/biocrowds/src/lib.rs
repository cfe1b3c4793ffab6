//! BioCrowds: marker-based crowd simulation with dynamic spring coupling.
//!
//! This is the facade crate re-exporting the public API of the BioCrowds
//! sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use biocrowds::prelude::*;
//!
//! let config = CrowdConfig::default();
//! let crowd = Crowd::from_agents([
//!     config
//!         .make_agent(AgentId(0), Vec3::new(10.0, 0.0, 10.0))
//!         .with_goal(Vec3::new(30.0, 0.0, 10.0)),
//! ])
//! .unwrap();
//! let mut engine = CrowdEngine::new(config, crowd).unwrap();
//!
//! let mut markers = MarkerAssignment::new();
//! markers.push(AgentId(0), Vec3::new(10.8, 0.0, 10.1));
//! markers.push(AgentId(0), Vec3::new(10.8, 0.0, 9.9));
//!
//! let outcome = engine
//!     .execute_tick(&SimContext::new(), &TickInputs::new(&markers))
//!     .unwrap();
//! assert!(!outcome.is_locked());
//! assert_eq!(engine.current_tick(), TickId(1));
//! assert!(engine.crowd().get(AgentId(0)).unwrap().position.x > 10.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `biocrowds-core` | Ids, agents, the crowd store, world extent, errors |
//! | [`arena`] | `biocrowds-arena` | Double buffer and concurrent multimap |
//! | [`space`] | `biocrowds-space` | Cell keys, grid index, occupancy quad-tree |
//! | [`steering`] | `biocrowds-steering` | Marker weights, steering, integration, fluid |
//! | [`springs`] | `biocrowds-springs` | Spring network, coupling lifecycle, solver |
//! | [`engine`] | `biocrowds-engine` | Tick driver, configuration, frame logging |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ids, agents, the crowd store and error types (`biocrowds-core`).
pub use biocrowds_core as types;

/// Double buffer and concurrent multimap (`biocrowds-arena`).
pub use biocrowds_arena as arena;

/// Cell-key scheme, per-tick grid index and occupancy tree (`biocrowds-space`).
///
/// [`space::GridIndex`] is rebuilt by the engine every tick.
pub use biocrowds_space as space;

/// Marker weighting, steering, position integration and fluid blending
/// (`biocrowds-steering`).
pub use biocrowds_steering as steering;

/// Springs between agents (`biocrowds-springs`).
///
/// [`springs::SpringNetwork`] holds the live links;
/// [`springs::SpringSolver`] integrates their forces.
pub use biocrowds_springs as springs;

/// The tick driver (`biocrowds-engine`).
pub use biocrowds_engine as engine;

/// Common imports for typical BioCrowds usage.
///
/// ```rust
/// use biocrowds::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use biocrowds_core::{Agent, AgentGoal, AgentId, Coupling, Crowd, TickId, Vec3, WorldExtent};

    // Errors
    pub use biocrowds_core::{CrowdError, StageError, StepError};

    // Space
    pub use biocrowds_space::{CellGrid, CellKey};

    // Collaborator inputs
    pub use biocrowds_springs::{MassMap, SpringParams};
    pub use biocrowds_steering::{FluidField, FluidParticle, MarkerAssignment};

    // Engine
    pub use biocrowds_engine::{
        ConfigError, CrowdConfig, CrowdEngine, FrameRecord, FrameRecorder, SimContext,
        StepMetrics, TickInputs, TickOutcome,
    };
}
