//! Utility modules for rust_pathfinder

pub mod grid_map;
pub mod visualization;

pub use grid_map::*;
pub use visualization::{cell_states, colors, CellState, Visualizer};
