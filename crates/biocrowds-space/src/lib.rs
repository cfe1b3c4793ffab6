//! Spatial indexing for BioCrowds.
//!
//! Positions are bucketed into a uniform grid of square cells. Each cell
//! is named by an odd integer [`CellKey`] so that the 8-neighbour ring of
//! a cell is reached by stepping ±2 on each axis. The [`GridIndex`] is
//! rebuilt from scratch every tick and is the shared lookup every later
//! stage reads.
//!
//! # Types
//!
//! - [`CellGrid`]: the key scheme for a given cell width
//! - [`GridIndex`]: cell → agents and agent → position, rebuilt per tick
//! - [`QuadTree`]: occupancy observer over the world rectangle

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod index;
pub mod quadtree;

pub use cell::{CellGrid, CellKey};
pub use error::SpaceError;
pub use index::GridIndex;
pub use quadtree::{QuadTree, Rect};
