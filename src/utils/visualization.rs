//! Visualization utilities for rust_pathfinder
//!
//! Renders a grid and a [`SearchSnapshot`] with gnuplot. The search engine
//! never depends on this module; it only reads snapshots.

use std::collections::HashSet;

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, PointSize, PointSymbol};

use crate::common::{GridCoord, PathfinderError, PathfinderResult};
use crate::path_planning::driver::SearchSnapshot;
use crate::utils::Grid;

/// Color palette for cell states
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const YELLOW: &str = "#FFFF00";
    pub const BLUE: &str = "#0000FF";
    pub const PURPLE: &str = "#FF00FF";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = RED;
    pub const FRONTIER: &str = YELLOW;
    pub const VISITED: &str = BLUE;
    pub const PATH: &str = PURPLE;
}

/// How a cell is painted; later variants take precedence over earlier ones
/// except that start and goal always keep their own color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Free,
    Obstacle,
    Frontier,
    Visited,
    Path,
    Start,
    Goal,
}

impl CellState {
    pub fn color(&self) -> Option<&'static str> {
        match self {
            CellState::Free => None,
            CellState::Obstacle => Some(colors::OBSTACLE),
            CellState::Frontier => Some(colors::FRONTIER),
            CellState::Visited => Some(colors::VISITED),
            CellState::Path => Some(colors::PATH),
            CellState::Start => Some(colors::START),
            CellState::Goal => Some(colors::GOAL),
        }
    }

    fn caption(&self) -> &'static str {
        match self {
            CellState::Free => "Free",
            CellState::Obstacle => "Obstacles",
            CellState::Frontier => "Frontier",
            CellState::Visited => "Visited",
            CellState::Path => "Path",
            CellState::Start => "Start",
            CellState::Goal => "Goal",
        }
    }
}

/// Classify every cell of `grid` for the given snapshot, row-major
pub fn cell_states(grid: &Grid, snapshot: &SearchSnapshot) -> Vec<(GridCoord, CellState)> {
    let frontier: HashSet<&GridCoord> = snapshot.frontier.iter().collect();
    let visited: HashSet<&GridCoord> = snapshot.visited.iter().collect();
    let path: HashSet<&GridCoord> = snapshot.path.iter().collect();

    grid.coords()
        .into_iter()
        .map(|coord| {
            let state = if coord == grid.start() {
                CellState::Start
            } else if coord == grid.goal() {
                CellState::Goal
            } else if !grid[coord].passable {
                CellState::Obstacle
            } else if path.contains(&coord) {
                CellState::Path
            } else if visited.contains(&coord) {
                CellState::Visited
            } else if frontier.contains(&coord) {
                CellState::Frontier
            } else {
                CellState::Free
            };
            (coord, state)
        })
        .collect()
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    point_size: f64,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            point_size: 1.0,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_point_size(&mut self, size: f64) -> &mut Self {
        self.point_size = size;
        self
    }

    /// Plot every non-free cell colored by its state. Rows are drawn top-down.
    pub fn plot_search(&mut self, grid: &Grid, snapshot: &SearchSnapshot) -> &mut Self {
        let states = cell_states(grid, snapshot);
        let layers = [
            CellState::Obstacle,
            CellState::Visited,
            CellState::Frontier,
            CellState::Path,
            CellState::Start,
            CellState::Goal,
        ];

        let axes = self.figure.axes2d();
        for layer in layers.iter() {
            let (x, y): (Vec<f64>, Vec<f64>) = states
                .iter()
                .filter(|(_, state)| state == layer)
                .map(|(coord, _)| (coord.x as f64, -(coord.y as f64)))
                .unzip();
            if x.is_empty() {
                continue;
            }
            if let Some(color) = layer.color() {
                axes.points(&x, &y, &[
                    Caption(layer.caption()),
                    Color(color.into()),
                    PointSymbol('S'),
                    PointSize(self.point_size),
                ]);
            }
        }

        let title = format!("A* search: {} after {} steps", snapshot.status, snapshot.steps);
        if self.title.is_empty() {
            self.title = title;
        }
        axes.set_x_range(AutoOption::Fix(-1.0), AutoOption::Fix(grid.width() as f64));
        axes.set_y_range(AutoOption::Fix(-(grid.height() as f64)), AutoOption::Fix(1.0));
        self
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> PathfinderResult<()> {
        self.apply_settings();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| PathfinderError::Visualization(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> PathfinderResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| PathfinderError::Visualization(e.to_string()))
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();
        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
