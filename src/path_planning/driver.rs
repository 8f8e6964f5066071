//! Incremental driver for stepwise searches
//!
//! The driver repeatedly advances a [`StepwiseSearch`] and hands out the
//! search state between steps. Everything is synchronous; a caller may
//! interleave any number of steps and reads. Consumers on another thread
//! should take a [`SearchSnapshot`] instead of holding references.

use log::{debug, warn};

use crate::common::{GridCoord, SearchStatus, StepwiseSearch};
use crate::path_planning::a_star::AStarSearch;
use crate::path_planning::heuristic::Manhattan;
use crate::utils::Grid;

/// Owned copy of the observable search state, taken between two steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnapshot {
    pub status: SearchStatus,
    pub steps: usize,
    pub frontier: Vec<GridCoord>,
    pub visited: Vec<GridCoord>,
    pub path: Vec<GridCoord>,
}

/// Drives a stepwise search to completion one expansion at a time
pub struct IncrementalDriver<S: StepwiseSearch> {
    search: S,
}

impl IncrementalDriver<AStarSearch<Manhattan>> {
    /// Driver over a default A* search on `grid`
    pub fn from_grid(grid: Grid) -> Self {
        Self::new(AStarSearch::with_defaults(grid))
    }
}

impl<S: StepwiseSearch> IncrementalDriver<S> {
    pub fn new(search: S) -> Self {
        IncrementalDriver { search }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn into_inner(self) -> S {
        self.search
    }

    pub fn status(&self) -> SearchStatus {
        self.search.status()
    }

    /// Advance by one expansion
    pub fn step_once(&mut self) -> SearchStatus {
        self.search.step()
    }

    /// Step until the search terminates
    pub fn run_to_completion(&mut self) -> SearchStatus {
        let guard = self.search.max_steps();
        for _ in 0..guard {
            if self.search.step().is_terminal() {
                break;
            }
        }

        let status = self.search.status();
        if status.is_terminal() {
            debug!(
                "search {} after {} expansions, path length {}",
                status,
                self.search.steps(),
                self.search.path().len()
            );
        } else {
            warn!("search still {} after {} step calls", status, guard);
        }
        status
    }

    pub fn current_frontier(&self) -> Vec<GridCoord> {
        self.search.frontier()
    }

    pub fn current_visited(&self) -> Vec<GridCoord> {
        self.search.visited()
    }

    pub fn current_path(&self) -> Vec<GridCoord> {
        self.search.path()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            status: self.search.status(),
            steps: self.search.steps(),
            frontier: self.search.frontier(),
            visited: self.search.visited(),
            path: self.search.path(),
        }
    }

    /// One snapshot per remaining step; the last item carries the terminal status
    pub fn snapshots(&mut self) -> Snapshots<'_, S> {
        Snapshots { driver: self }
    }
}

/// Iterator returned by [`IncrementalDriver::snapshots`]
pub struct Snapshots<'a, S: StepwiseSearch> {
    driver: &'a mut IncrementalDriver<S>,
}

impl<'a, S: StepwiseSearch> Iterator for Snapshots<'a, S> {
    type Item = SearchSnapshot;

    fn next(&mut self) -> Option<SearchSnapshot> {
        if self.driver.status().is_terminal() {
            return None;
        }
        self.driver.step_once();
        Some(self.driver.snapshot())
    }
}
