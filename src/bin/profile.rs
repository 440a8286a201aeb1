use std::time::Duration;

use mazetrace::{
    config::Config,
    engine::MazeEngine,
    logging,
    maze::Coord,
    solvers::{SolveStatus, Solver, StepEvent},
};

const DEFAULT_ITERATIONS: usize = 10;

#[derive(Default)]
struct Totals {
    explored: usize,
    path_len: usize,
    reached: usize,
    elapsed: Duration,
}

fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ITERATIONS)
        .max(1);

    let _log_guard = logging::init(&Config::log_dir_from_env())?;
    let config = Config {
        rows: Config::MAX_DIMENSION,
        cols: Config::MAX_DIMENSION,
        ..Config::headless()
    };
    let goal = Coord::new(config.rows - 1, config.cols - 1);
    let mut engine = MazeEngine::new(config);
    let mut totals: Vec<(Solver, Totals)> =
        Solver::ALL.iter().map(|&s| (s, Totals::default())).collect();

    for seed in 0..num_iters as u64 {
        engine.generate_maze(Some(seed));
        if let Err(e) = engine
            .set_start(Coord::new(0, 0))
            .and_then(|_| engine.set_end(goal))
        {
            eprintln!("Could not place endpoints: {}", e);
            return Ok(());
        }
        for (solver, total) in totals.iter_mut() {
            let mut steps = Vec::<StepEvent>::new();
            let outcome = match engine.solve_blocking(*solver, &mut steps) {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("{} failed: {}", solver, e);
                    return Ok(());
                }
            };
            total.explored += outcome.explored;
            total.path_len += outcome.path.len();
            total.elapsed += outcome.elapsed;
            if outcome.status == SolveStatus::Reached {
                total.reached += 1;
            }
        }
    }

    println!(
        "{} mazes of {}x{} cells, start (0, 0), end {}",
        num_iters, engine.maze().rows(), engine.maze().cols(), goal
    );
    for (solver, total) in &totals {
        let avg_elapsed = total.elapsed / num_iters as u32;
        println!(
            "{:<28} reached {}/{}  avg explored {:>8}  avg path {:>6}  avg time {:?}",
            solver.to_string(),
            total.reached,
            num_iters,
            total.explored / num_iters,
            total.path_len / num_iters,
            avg_elapsed
        );
        tracing::info!(
            solver = %solver,
            iterations = num_iters,
            avg_explored = total.explored / num_iters,
            avg_path = total.path_len / num_iters,
            ?avg_elapsed,
            "Profile summary"
        );
    }
    Ok(())
}
