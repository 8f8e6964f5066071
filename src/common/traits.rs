//! Common traits defining interfaces for the pathfinder

use crate::common::types::*;

/// Distance estimate from a cell to the goal.
///
/// Implementations must be admissible (never overestimate the remaining
/// unit-step cost) and consistent (`h(a) <= 1 + h(b)` for adjacent `a`, `b`),
/// otherwise the returned path is no longer guaranteed to be shortest.
pub trait Heuristic {
    fn estimate(&self, cell: GridCoord, goal: GridCoord) -> u32;
}

/// A search that advances one expansion at a time and can be inspected
/// between steps
pub trait StepwiseSearch {
    /// Perform one expansion; no-op once terminal
    fn step(&mut self) -> SearchStatus;

    /// Current lifecycle status
    fn status(&self) -> SearchStatus;

    /// Number of expansions performed so far
    fn steps(&self) -> usize;

    /// Frontier coordinates in first-discovered order
    fn frontier(&self) -> Vec<GridCoord>;

    /// Visited coordinates in expansion order
    fn visited(&self) -> Vec<GridCoord>;

    /// Best path so far, start first
    fn path(&self) -> Vec<GridCoord>;

    /// Upper bound on the number of expansions the search can perform
    fn max_steps(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantHeuristic(u32);

    impl Heuristic for ConstantHeuristic {
        fn estimate(&self, _cell: GridCoord, _goal: GridCoord) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_heuristic_trait_object() {
        let h: Box<dyn Heuristic> = Box::new(ConstantHeuristic(3));
        assert_eq!(h.estimate(GridCoord::origin(), GridCoord::new(1, 1)), 3);
    }
}
