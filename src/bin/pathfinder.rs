// Stepwise A* pathfinder demo
// builds a random obstacle map, steps the search to completion and plots the result

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_pathfinder::utils::Visualizer;
use rust_pathfinder::{Grid, GridConfig, IncrementalDriver, SearchStatus};

const SHOW_ANIMATION: bool = true;
const LOG_EVERY: usize = 100;
const OUTPUT_PATH: &str = "img/path_planning/pathfinder_result.png";

fn main() {
    env_logger::init();
    info!("A* pathfinder start!!");

    // optional seed as the first argument for a reproducible map
    let mut rng = match std::env::args().nth(1).map(|arg| arg.parse::<u64>()) {
        Some(Ok(seed)) => StdRng::seed_from_u64(seed),
        Some(Err(e)) => {
            error!("invalid seed: {}", e);
            return;
        }
        None => StdRng::from_entropy(),
    };

    let config = GridConfig::default();
    let grid = match Grid::random(&config, &mut rng) {
        Ok(grid) => grid,
        Err(e) => {
            error!("map generation failed: {}", e);
            return;
        }
    };
    info!(
        "{}x{} map, start {} goal {}, {} obstacles",
        grid.width(),
        grid.height(),
        grid.start(),
        grid.goal(),
        grid.obstacles().len()
    );

    let mut driver = IncrementalDriver::from_grid(grid);
    let mut last = driver.snapshot();
    for snapshot in driver.snapshots() {
        if snapshot.steps % LOG_EVERY == 0 {
            info!(
                "step {}: frontier {}, visited {}",
                snapshot.steps,
                snapshot.frontier.len(),
                snapshot.visited.len()
            );
        }
        last = snapshot;
    }

    match last.status {
        SearchStatus::Succeeded => info!(
            "path found with {} cells after {} steps",
            last.path.len(),
            last.steps
        ),
        SearchStatus::Failed => info!("no path exists, {} cells visited", last.visited.len()),
        other => error!("search stopped while {}", other),
    }

    if SHOW_ANIMATION {
        let mut vis = Visualizer::new();
        vis.plot_search(driver.search().grid(), &last);
        match vis.save_png(OUTPUT_PATH, 1200, 800) {
            Ok(()) => info!("Plot saved to: {}", OUTPUT_PATH),
            Err(e) => error!("{}", e),
        }
    }

    info!("A* pathfinder finish!!");
}
