//! RustPathfinder - stepwise A* search on obstacle grids
//!
//! This crate provides an A* engine that expands one cell per step and
//! exposes its frontier, visited set and best path between steps, plus a
//! driver that runs it to completion and a gnuplot renderer for snapshots.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{CellKind, GridCoord, SearchStatus};
pub use common::{Heuristic, StepwiseSearch};
pub use common::{PathfinderError, PathfinderResult};
pub use path_planning::{AStarSearch, IncrementalDriver, RelaxationPolicy, SearchConfig, SearchSnapshot};
pub use utils::{Grid, GridConfig};
