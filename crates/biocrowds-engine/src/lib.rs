//! Simulation engine for BioCrowds crowds.
//!
//! [`CrowdEngine`] owns the crowd, the spring network and the per-tick
//! scratch structures, and runs one tick per [`CrowdEngine::execute_tick`]
//! call:
//!
//! ```text
//! grid index → marker weights → steering → [springs] → [fluid] → integrate
//! ```
//!
//! Each tick works on a staging copy of the crowd and spring network and
//! publishes it only when every stage succeeded, so a failed tick leaves
//! no trace. Configuration comes from [`CrowdConfig`], optionally parsed
//! from TOML; [`FrameRecorder`] writes per-tick frames as JSON lines.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod metrics;
pub mod record;
pub mod tick;

pub use config::{ConfigError, CouplingConfig, CrowdConfig, FluidConfig, SpringConfig};
pub use context::{SimContext, TickInputs};
pub use metrics::StepMetrics;
pub use record::{AgentFrame, FrameRecord, FrameRecorder, RecordError};
pub use tick::{CrowdEngine, TickOutcome};
