//! Working storage for the sub-stepped stages of a BioCrowds tick.
//!
//! Two building blocks:
//!
//! - [`PingPong`]: two owned buffers with a "current" and a "next" role,
//!   exchanged by flipping a flag instead of copying
//! - [`MultiMap`]: a concurrent many-writer accumulator keyed by
//!   destination id, for force buckets and similar fan-in

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod multimap;
pub mod pingpong;

pub use multimap::MultiMap;
pub use pingpong::PingPong;
