//! Stepwise A* search on a 4-connected obstacle grid
//!
//! Unlike a one-shot planner, [`AStarSearch`] performs a single expansion per
//! [`StepwiseSearch::step`] call so the frontier, the visited set and the
//! best path so far can be inspected between expansions.
//!
//! Ties on `f_cost` are broken by the order in which cells were first added
//! to the frontier, which makes runs on identical input reproducible.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use log::{debug, trace, warn};

use crate::common::{GridCoord, Heuristic, SearchStatus, StepwiseSearch};
use crate::path_planning::heuristic::Manhattan;
use crate::utils::Grid;

/// How a frontier cell's cost and parent react to a new candidate route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationPolicy {
    /// Cost, estimate and parent change together, and only when the
    /// candidate route is strictly cheaper
    Joint,
    /// `g` and `f` each keep the minimum seen; the parent always moves to the
    /// cell being expanded, even when its route is not the cheaper one
    Independent,
}

impl Default for RelaxationPolicy {
    fn default() -> Self {
        RelaxationPolicy::Joint
    }
}

/// Configuration for the stepwise A* search
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub relaxation: RelaxationPolicy,
}

/// Open-set entry; the heap pops the lowest `f_cost`, then the earliest `order`
#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    f_cost: u32,
    order: u64,
    coord: GridCoord,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search that owns its grid and advances one expansion at a time
pub struct AStarSearch<H: Heuristic = Manhattan> {
    grid: Grid,
    heuristic: H,
    config: SearchConfig,
    status: SearchStatus,
    open_heap: BinaryHeap<FrontierEntry>,
    // coord -> order of first insertion
    open_set: HashMap<GridCoord, u64>,
    next_order: u64,
    closed_set: HashSet<GridCoord>,
    closed_order: Vec<GridCoord>,
    current: Option<GridCoord>,
    path: Vec<GridCoord>,
}

impl AStarSearch<Manhattan> {
    /// Manhattan heuristic and joint relaxation
    pub fn with_defaults(grid: Grid) -> Self {
        Self::new(grid, Manhattan, SearchConfig::default())
    }
}

impl<H: Heuristic> AStarSearch<H> {
    pub fn new(mut grid: Grid, heuristic: H, config: SearchConfig) -> Self {
        grid.reset_search_state();
        AStarSearch {
            grid,
            heuristic,
            config,
            status: SearchStatus::Ready,
            open_heap: BinaryHeap::new(),
            open_set: HashMap::new(),
            next_order: 0,
            closed_set: HashSet::new(),
            closed_order: Vec::new(),
            current: None,
            path: Vec::new(),
        }
    }

    /// Discard all search progress and return to `Ready`
    pub fn reset(&mut self) {
        self.grid.reset_search_state();
        self.status = SearchStatus::Ready;
        self.open_heap.clear();
        self.open_set.clear();
        self.next_order = 0;
        self.closed_set.clear();
        self.closed_order.clear();
        self.current = None;
        self.path.clear();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Most recently expanded cell
    pub fn current(&self) -> Option<GridCoord> {
        self.current
    }

    pub fn is_visited(&self, coord: GridCoord) -> bool {
        self.closed_set.contains(&coord)
    }

    pub fn in_frontier(&self, coord: GridCoord) -> bool {
        self.open_set.contains_key(&coord)
    }

    /// `g_cost` recorded at the end of the current path
    pub fn path_cost(&self) -> Option<u32> {
        self.path.last().and_then(|&end| self.grid[end].g_cost)
    }

    fn seed(&mut self) {
        let start = self.grid.start();
        let h = self.heuristic.estimate(start, self.grid.goal());
        let cell = self.grid.cell_mut(start);
        cell.g_cost = Some(0);
        cell.f_cost = Some(h);
        cell.parent = None;
        self.insert_frontier(start);
        self.open_heap.push(FrontierEntry {
            f_cost: h,
            order: self.open_set[&start],
            coord: start,
        });
        self.status = SearchStatus::Running;
        trace!("[AStar] seeded start={} h={}", start, h);
    }

    fn insert_frontier(&mut self, coord: GridCoord) {
        let order = self.next_order;
        self.open_set.insert(coord, order);
        self.next_order += 1;
    }

    /// Pop the best live frontier member, skipping superseded heap entries
    fn pop_best(&mut self) -> Option<GridCoord> {
        while let Some(entry) = self.open_heap.pop() {
            if !self.open_set.contains_key(&entry.coord) {
                continue;
            }
            if self.grid[entry.coord].f_cost != Some(entry.f_cost) {
                continue;
            }
            self.open_set.remove(&entry.coord);
            return Some(entry.coord);
        }
        None
    }

    fn relax(&mut self, current: GridCoord, current_g: u32, neighbor: GridCoord) {
        if !self.open_set.contains_key(&neighbor) {
            self.insert_frontier(neighbor);
        }

        let candidate = current_g + 1;
        let h = self.heuristic.estimate(neighbor, self.grid.goal());
        let policy = self.config.relaxation;

        let cell = self.grid.cell_mut(neighbor);
        let old_f = cell.f_cost;
        match policy {
            RelaxationPolicy::Joint => {
                if cell.g_cost.map_or(true, |g| candidate < g) {
                    cell.g_cost = Some(candidate);
                    cell.f_cost = Some(candidate + h);
                    cell.parent = Some(current);
                }
            }
            RelaxationPolicy::Independent => {
                let g = cell.g_cost.map_or(candidate, |g| g.min(candidate));
                cell.g_cost = Some(g);
                cell.f_cost = Some(cell.f_cost.map_or(g + h, |f| f.min(g + h)));
                cell.parent = Some(current);
            }
        }
        let new_f = cell.f_cost;

        if new_f != old_f {
            if let Some(f_cost) = new_f {
                self.open_heap.push(FrontierEntry {
                    f_cost,
                    order: self.open_set[&neighbor],
                    coord: neighbor,
                });
            }
        }
    }

    /// Walk parent links back from `end`, returning the path start first
    fn reconstruct_path(&self, end: GridCoord) -> Vec<GridCoord> {
        let limit = self.grid.width() * self.grid.height();
        let mut path = vec![end];
        let mut cursor = end;
        while let Some(parent) = self.grid[cursor].parent {
            if path.len() >= limit {
                debug!("[AStar] parent chain from {} exceeds {} cells", end, limit);
                break;
            }
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

impl<H: Heuristic> StepwiseSearch for AStarSearch<H> {
    fn step(&mut self) -> SearchStatus {
        match self.status {
            SearchStatus::Succeeded | SearchStatus::Failed => return self.status,
            SearchStatus::Ready => self.seed(),
            SearchStatus::Running => {}
        }

        let current = match self.pop_best() {
            Some(coord) => coord,
            None => {
                debug!(
                    "[AStar] FAILED: frontier exhausted after {} expansions",
                    self.closed_order.len()
                );
                self.status = SearchStatus::Failed;
                return self.status;
            }
        };

        self.closed_set.insert(current);
        self.closed_order.push(current);
        self.current = Some(current);
        trace!(
            "[AStar] expand {} g={:?} f={:?} open={}",
            current,
            self.grid[current].g_cost,
            self.grid[current].f_cost,
            self.open_set.len()
        );

        if current == self.grid.goal() {
            self.path = self.reconstruct_path(current);
            self.status = SearchStatus::Succeeded;
            debug!(
                "[AStar] goal reached after {} expansions, path has {} cells",
                self.closed_order.len(),
                self.path.len()
            );
            return self.status;
        }

        match self.grid[current].g_cost {
            Some(current_g) => {
                for neighbor in self.grid.passable_neighbors(current) {
                    if self.closed_set.contains(&neighbor) {
                        continue;
                    }
                    self.relax(current, current_g, neighbor);
                }
            }
            None => warn!("[AStar] expanded {} without a cost, neighbors not relaxed", current),
        }

        self.path = self.reconstruct_path(current);
        self.status
    }

    fn status(&self) -> SearchStatus {
        self.status
    }

    fn steps(&self) -> usize {
        self.closed_order.len()
    }

    fn frontier(&self) -> Vec<GridCoord> {
        let mut members: Vec<(u64, GridCoord)> =
            self.open_set.iter().map(|(&coord, &order)| (order, coord)).collect();
        members.sort_unstable();
        members.into_iter().map(|(_, coord)| coord).collect()
    }

    fn visited(&self) -> Vec<GridCoord> {
        self.closed_order.clone()
    }

    fn path(&self) -> Vec<GridCoord> {
        self.path.clone()
    }

    fn max_steps(&self) -> usize {
        self.grid.passable_count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::heuristic::Zero;

    fn open_search(width: usize, height: usize, start: (i32, i32), goal: (i32, i32)) -> AStarSearch {
        let grid = Grid::new(width, height, start.into(), goal.into()).unwrap();
        AStarSearch::with_defaults(grid)
    }

    fn run(search: &mut impl StepwiseSearch) -> SearchStatus {
        while !search.step().is_terminal() {}
        search.status()
    }

    fn assert_valid_path(path: &[GridCoord], start: GridCoord, goal: GridCoord) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]), "{} -> {} is not a unit move", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_open_5x5_corner_to_corner() {
        let mut search = open_search(5, 5, (0, 0), (4, 4));
        assert_eq!(run(&mut search), SearchStatus::Succeeded);

        let path = search.path();
        assert_eq!(path.len(), 9);
        assert_valid_path(&path, GridCoord::new(0, 0), GridCoord::new(4, 4));
        assert_eq!(search.path_cost(), Some(8));
    }

    #[test]
    fn test_ready_before_first_step() {
        let search = open_search(3, 3, (0, 0), (2, 2));
        assert_eq!(search.status(), SearchStatus::Ready);
        assert!(search.frontier().is_empty());
        assert!(search.visited().is_empty());
        assert!(search.path().is_empty());
        assert_eq!(search.current(), None);
    }

    #[test]
    fn test_first_step_expands_start() {
        let mut search = open_search(3, 3, (1, 1), (2, 2));
        assert_eq!(search.step(), SearchStatus::Running);
        assert_eq!(search.visited(), vec![GridCoord::new(1, 1)]);
        assert_eq!(
            search.frontier(),
            vec![
                GridCoord::new(2, 1),
                GridCoord::new(0, 1),
                GridCoord::new(1, 2),
                GridCoord::new(1, 0),
            ]
        );
        assert_eq!(search.path(), vec![GridCoord::new(1, 1)]);
        assert_eq!(search.grid()[GridCoord::new(2, 1)].g_cost, Some(1));
        assert_eq!(search.grid()[GridCoord::new(2, 1)].f_cost, Some(2));
    }

    #[test]
    fn test_expansion_without_cost_skips_neighbors() {
        let mut search = open_search(3, 3, (1, 1), (2, 2));
        search.step();
        assert!(search.in_frontier(GridCoord::new(2, 1)));
        search.grid.cell_mut(GridCoord::new(2, 1)).g_cost = None;

        assert_eq!(search.step(), SearchStatus::Running);
        assert_eq!(search.current(), Some(GridCoord::new(2, 1)));
        assert!(!search.in_frontier(GridCoord::new(2, 1)));
        assert!(!search.in_frontier(GridCoord::new(2, 0)));
        assert!(!search.in_frontier(GridCoord::new(2, 2)));
        assert_eq!(
            search.frontier(),
            vec![GridCoord::new(0, 1), GridCoord::new(1, 2), GridCoord::new(1, 0)]
        );
    }

    #[test]
    fn test_tie_break_prefers_first_discovered() {
        // (1,0) and (0,1) both have f = 8; East is discovered first
        let mut search = open_search(5, 5, (0, 0), (4, 4));
        search.step();
        search.step();
        assert_eq!(search.current(), Some(GridCoord::new(1, 0)));
        search.step();
        assert_eq!(search.current(), Some(GridCoord::new(0, 1)));
    }

    #[test]
    fn test_joint_keeps_first_parent_on_equal_cost() {
        let mut search = open_search(5, 5, (0, 0), (4, 4));
        for _ in 0..3 {
            search.step();
        }
        let cell = &search.grid()[GridCoord::new(1, 1)];
        assert_eq!(cell.parent, Some(GridCoord::new(1, 0)));
        assert_eq!(cell.g_cost, Some(2));
    }

    #[test]
    fn test_independent_moves_parent_to_latest_expansion() {
        let grid = Grid::new(5, 5, GridCoord::new(0, 0), GridCoord::new(4, 4)).unwrap();
        let config = SearchConfig {
            relaxation: RelaxationPolicy::Independent,
        };
        let mut search = AStarSearch::new(grid, Manhattan, config);
        assert_eq!(search.config().relaxation, RelaxationPolicy::Independent);
        for _ in 0..3 {
            search.step();
        }
        let cell = &search.grid()[GridCoord::new(1, 1)];
        assert_eq!(cell.parent, Some(GridCoord::new(0, 1)));
        assert_eq!(cell.g_cost, Some(2));
        assert_eq!(cell.f_cost, Some(8));

        assert_eq!(run(&mut search), SearchStatus::Succeeded);
        assert_valid_path(&search.path(), GridCoord::new(0, 0), GridCoord::new(4, 4));
    }

    #[test]
    fn test_enclosed_goal_fails() {
        let grid: Grid = "S#.\n#G#\n.#.".parse().unwrap();
        let mut search = AStarSearch::with_defaults(grid);
        assert_eq!(run(&mut search), SearchStatus::Failed);
        assert!(search.frontier().is_empty());
        assert!(!search.is_visited(GridCoord::new(1, 1)));
        assert_eq!(search.visited(), vec![GridCoord::new(0, 0)]);
    }

    #[test]
    fn test_enclosed_goal_visits_every_reachable_cell() {
        let grid: Grid = "\
            S....
            .....
            ..#..
            ....#
            ...#G"
            .parse()
            .unwrap();
        let mut search = AStarSearch::with_defaults(grid);
        assert_eq!(run(&mut search), SearchStatus::Failed);
        assert_eq!(search.visited().len(), 25 - 3 - 1);
        assert!(search.frontier().is_empty());
    }

    #[test]
    fn test_detour_around_wall() {
        let grid: Grid = "\
            S.#..
            ..#..
            ..#..
            .....
            ..#.G"
            .parse()
            .unwrap();
        let mut search = AStarSearch::with_defaults(grid);
        assert_eq!(run(&mut search), SearchStatus::Succeeded);
        let path = search.path();
        // down to row 3, across, then to the goal
        assert_eq!(path.len(), 9);
        assert_valid_path(&path, GridCoord::new(0, 0), GridCoord::new(4, 4));
        assert!(path.iter().all(|&c| search.grid()[c].passable));
    }

    #[test]
    fn test_terminal_step_is_noop() {
        let mut search = open_search(4, 3, (0, 0), (3, 2));
        let status = run(&mut search);
        let frontier = search.frontier();
        let visited = search.visited();
        let path = search.path();

        assert_eq!(search.step(), status);
        assert_eq!(search.step(), status);
        assert_eq!(search.frontier(), frontier);
        assert_eq!(search.visited(), visited);
        assert_eq!(search.path(), path);
    }

    #[test]
    fn test_zero_heuristic_finds_same_length() {
        let grid: Grid = "\
            S...
            .##.
            ...G"
            .parse()
            .unwrap();
        let mut dijkstra = AStarSearch::new(grid.clone(), Zero, SearchConfig::default());
        let mut a_star = AStarSearch::with_defaults(grid);
        assert_eq!(run(&mut dijkstra), SearchStatus::Succeeded);
        assert_eq!(run(&mut a_star), SearchStatus::Succeeded);
        assert_eq!(dijkstra.path().len(), a_star.path().len());
        assert!(dijkstra.steps() >= a_star.steps());
    }

    #[test]
    fn test_reset_restarts_search() {
        let mut search = open_search(3, 3, (0, 0), (2, 2));
        run(&mut search);
        let first_path = search.path();
        search.reset();
        assert_eq!(search.status(), SearchStatus::Ready);
        assert!(search.visited().is_empty());
        assert_eq!(search.grid()[GridCoord::new(2, 2)].g_cost, None);
        run(&mut search);
        assert_eq!(search.path(), first_path);
    }

    #[test]
    fn test_frontier_entry_ordering() {
        let a = FrontierEntry { f_cost: 3, order: 5, coord: GridCoord::new(0, 0) };
        let b = FrontierEntry { f_cost: 3, order: 2, coord: GridCoord::new(1, 0) };
        let c = FrontierEntry { f_cost: 1, order: 9, coord: GridCoord::new(2, 0) };
        let mut heap = BinaryHeap::new();
        heap.push(a);
        heap.push(b);
        heap.push(c);
        assert_eq!(heap.pop().map(|e| e.order), Some(9));
        assert_eq!(heap.pop().map(|e| e.order), Some(2));
        assert_eq!(heap.pop().map(|e| e.order), Some(5));
    }
}
