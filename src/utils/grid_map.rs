// grid map definition for the stepwise planner
// cells are stored row-major in a nalgebra matrix: row = y, column = x

use std::ops::Index;
use std::str::FromStr;

use itertools::iproduct;
use log::debug;
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::common::{CellKind, GridCoord, PathfinderError, PathfinderResult};

extern crate nalgebra as na;

/// Configuration for random map generation
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Probability in [0, 1] that a non-endpoint cell is blocked
    pub obstacle_density: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 40,
            obstacle_density: 0.3,
        }
    }
}

/// One grid cell: static classification plus per-search metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub passable: bool,
    /// Best known cost from the start, `None` while unknown
    pub g_cost: Option<u32>,
    /// `g_cost + h`, `None` while unknown
    pub f_cost: Option<u32>,
    /// Predecessor on the best known path
    pub parent: Option<GridCoord>,
}

impl Cell {
    pub fn free() -> Self {
        Cell {
            passable: true,
            g_cost: None,
            f_cost: None,
            parent: None,
        }
    }

    pub fn blocked() -> Self {
        Cell {
            passable: false,
            ..Cell::free()
        }
    }

    pub fn kind(&self) -> CellKind {
        if self.passable {
            CellKind::Passable
        } else {
            CellKind::Blocked
        }
    }

    fn clear_search_state(&mut self) {
        self.g_cost = None;
        self.f_cost = None;
        self.parent = None;
    }
}

/// Fixed-size obstacle grid with exactly one start and one goal
#[derive(Debug, Clone)]
pub struct Grid {
    cells: na::DMatrix<Cell>,
    start: GridCoord,
    goal: GridCoord,
}

impl Grid {
    /// Create an obstacle-free grid
    pub fn new(width: usize, height: usize, start: GridCoord, goal: GridCoord) -> PathfinderResult<Self> {
        if width == 0 || height == 0 {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "grid dimensions {}x{} exceed the coordinate range",
                width, height
            )));
        }

        let grid = Grid {
            cells: na::DMatrix::from_element(height, width, Cell::free()),
            start,
            goal,
        };

        if !grid.contains(start) {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "start {} is outside the {}x{} grid",
                start, width, height
            )));
        }
        if !grid.contains(goal) {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "goal {} is outside the {}x{} grid",
                goal, width, height
            )));
        }
        if start == goal {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "start and goal must differ, both are {}",
                start
            )));
        }

        Ok(grid)
    }

    /// Create a grid with an explicit obstacle set
    pub fn with_obstacles(
        width: usize,
        height: usize,
        start: GridCoord,
        goal: GridCoord,
        obstacles: &[GridCoord],
    ) -> PathfinderResult<Self> {
        let mut grid = Self::new(width, height, start, goal)?;
        for &obstacle in obstacles {
            grid.set_obstacle(obstacle, true)?;
        }
        Ok(grid)
    }

    /// Generate a map with random distinct endpoints and random obstacles
    pub fn random<R: Rng + ?Sized>(config: &GridConfig, rng: &mut R) -> PathfinderResult<Self> {
        if config.width.saturating_mul(config.height) < 2 {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "a {}x{} grid cannot hold distinct start and goal",
                config.width, config.height
            )));
        }
        if config.width > i32::MAX as usize || config.height > i32::MAX as usize {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "grid dimensions {}x{} exceed the coordinate range",
                config.width, config.height
            )));
        }
        let bernoulli = Bernoulli::new(config.obstacle_density).map_err(|e| {
            PathfinderError::InvalidConfiguration(format!(
                "obstacle density {}: {}",
                config.obstacle_density, e
            ))
        })?;

        let width = config.width as i32;
        let height = config.height as i32;
        let start = GridCoord::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let mut goal = start;
        while goal == start {
            goal = GridCoord::new(rng.gen_range(0..width), rng.gen_range(0..height));
        }

        let mut grid = Self::new(config.width, config.height, start, goal)?;
        for coord in grid.coords() {
            if coord != start && coord != goal && bernoulli.sample(rng) {
                grid.cell_mut(coord).passable = false;
            }
        }

        debug!(
            "generated {}x{} map: start={} goal={} obstacles={}",
            config.width,
            config.height,
            start,
            goal,
            grid.obstacles().len()
        );
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    pub fn start(&self) -> GridCoord {
        self.start
    }

    pub fn goal(&self) -> GridCoord {
        self.goal
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width()
            && (coord.y as usize) < self.height()
    }

    fn check_bounds(&self, coord: GridCoord) -> PathfinderResult<(usize, usize)> {
        if self.contains(coord) {
            Ok((coord.y as usize, coord.x as usize))
        } else {
            Err(PathfinderError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    pub fn cell(&self, coord: GridCoord) -> PathfinderResult<&Cell> {
        let index = self.check_bounds(coord)?;
        Ok(&self.cells[index])
    }

    /// Callers guarantee `coord` is in bounds
    pub(crate) fn cell_mut(&mut self, coord: GridCoord) -> &mut Cell {
        &mut self.cells[(coord.y as usize, coord.x as usize)]
    }

    pub fn classify(&self, coord: GridCoord) -> PathfinderResult<CellKind> {
        self.cell(coord).map(Cell::kind)
    }

    /// Block or clear a cell. Blocking the start or goal is rejected.
    pub fn set_obstacle(&mut self, coord: GridCoord, blocked: bool) -> PathfinderResult<()> {
        self.check_bounds(coord)?;
        if blocked && (coord == self.start || coord == self.goal) {
            return Err(PathfinderError::InvalidConfiguration(format!(
                "cannot block {} at {}",
                if coord == self.start { "start" } else { "goal" },
                coord
            )));
        }
        self.cell_mut(coord).passable = !blocked;
        Ok(())
    }

    /// In-bounds passable orthogonal neighbours, East, West, South, North
    pub fn neighbors(&self, coord: GridCoord) -> PathfinderResult<Vec<GridCoord>> {
        self.check_bounds(coord)?;
        Ok(self.passable_neighbors(coord))
    }

    pub(crate) fn passable_neighbors(&self, coord: GridCoord) -> Vec<GridCoord> {
        coord
            .neighbors_4()
            .iter()
            .copied()
            .filter(|&n| self.contains(n) && self[n].passable)
            .collect()
    }

    /// Forget every cost estimate and parent link
    pub fn reset_search_state(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear_search_state);
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> Vec<GridCoord> {
        iproduct!(0..self.height() as i32, 0..self.width() as i32)
            .map(|(y, x)| GridCoord::new(x, y))
            .collect()
    }

    pub fn obstacles(&self) -> Vec<GridCoord> {
        self.coords()
            .into_iter()
            .filter(|&c| !self[c].passable)
            .collect()
    }

    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.passable).count()
    }
}

impl Index<GridCoord> for Grid {
    type Output = Cell;

    /// Panics when `coord` is outside the grid; use [`Grid::cell`] to get an error instead
    fn index(&self, coord: GridCoord) -> &Cell {
        match self.check_bounds(coord) {
            Ok(index) => &self.cells[index],
            Err(e) => panic!("{}", e),
        }
    }
}

impl FromStr for Grid {
    type Err = PathfinderError;

    /// Parse a layout of `.` (free), `#` (blocked), `S` (start) and `G` (goal)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(str::trim).collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        let rows = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => return Err(PathfinderError::Parse("empty grid layout".to_string())),
        };
        if let Some(y) = rows.iter().position(|l| l.is_empty()) {
            return Err(PathfinderError::Parse(format!("row {} is empty", y)));
        }

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut start = None;
        let mut goal = None;
        let mut obstacles = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(PathfinderError::Parse(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let coord = GridCoord::new(x as i32, y as i32);
                match ch {
                    '.' => {}
                    '#' => obstacles.push(coord),
                    'S' if start.is_none() => start = Some(coord),
                    'G' if goal.is_none() => goal = Some(coord),
                    'S' | 'G' => {
                        return Err(PathfinderError::Parse(format!(
                            "duplicate '{}' at {}",
                            ch, coord
                        )))
                    }
                    other => {
                        return Err(PathfinderError::Parse(format!(
                            "unexpected character '{}' at {}",
                            other, coord
                        )))
                    }
                }
            }
        }

        let start = start.ok_or_else(|| PathfinderError::Parse("missing start 'S'".to_string()))?;
        let goal = goal.ok_or_else(|| PathfinderError::Parse("missing goal 'G'".to_string()))?;
        Grid::with_obstacles(width, height, start, goal, &obstacles)
    }
}
