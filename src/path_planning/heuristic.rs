//! Distance heuristics for 4-connected unit-cost grids

use crate::common::{GridCoord, Heuristic};

/// Manhattan distance, admissible and consistent on a 4-connected grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, cell: GridCoord, goal: GridCoord) -> u32 {
        cell.manhattan_distance(&goal)
    }
}

/// Always zero; expansion order becomes uniform-cost (Dijkstra)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zero;

impl Heuristic for Zero {
    fn estimate(&self, _cell: GridCoord, _goal: GridCoord) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        let goal = GridCoord::new(4, 4);
        assert_eq!(Manhattan.estimate(GridCoord::new(0, 0), goal), 8);
        assert_eq!(Manhattan.estimate(goal, goal), 0);
        assert_eq!(Manhattan.estimate(GridCoord::new(6, 1), goal), 5);
    }

    #[test]
    fn test_manhattan_is_consistent() {
        let goal = GridCoord::new(3, 2);
        for x in 0..6 {
            for y in 0..6 {
                let a = GridCoord::new(x, y);
                for b in a.neighbors_4().iter() {
                    assert!(Manhattan.estimate(a, goal) <= 1 + Manhattan.estimate(*b, goal));
                }
            }
        }
    }

    #[test]
    fn test_zero() {
        assert_eq!(Zero.estimate(GridCoord::new(9, 9), GridCoord::origin()), 0);
    }
}
