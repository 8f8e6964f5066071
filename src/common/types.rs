//! Common types used throughout rust_pathfinder

use std::fmt;

/// Integer cell coordinate. `x` grows east (column), `y` grows south (row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Manhattan (L1) distance to another coordinate
    pub fn manhattan_distance(&self, other: &GridCoord) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// True when the two coordinates share an edge
    pub fn is_adjacent(&self, other: &GridCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Orthogonal neighbours in East, West, South, North order, unchecked
    pub fn neighbors_4(&self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x + 1, self.y),
            GridCoord::new(self.x - 1, self.y),
            GridCoord::new(self.x, self.y + 1),
            GridCoord::new(self.x, self.y - 1),
        ]
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from(tuple: (i32, i32)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Static classification of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Passable,
    Blocked,
}

impl CellKind {
    pub fn is_passable(&self) -> bool {
        matches!(self, CellKind::Passable)
    }
}

/// Lifecycle of a stepwise search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// No step taken yet
    Ready,
    /// At least one expansion done, goal not reached, frontier not exhausted
    Running,
    /// Goal expanded; the path is final
    Succeeded,
    /// Frontier exhausted without reaching the goal
    Failed,
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchStatus::Succeeded | SearchStatus::Failed)
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStatus::Ready => "ready",
            SearchStatus::Running => "running",
            SearchStatus::Succeeded => "succeeded",
            SearchStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
