use rand::{SeedableRng, rngs::StdRng};

mod recur_backtrack;

pub use recur_backtrack::recursive_backtrack;

use crate::maze::Maze;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Carve a perfect maze from a seed and return the number of passages opened.
pub fn generate_maze(maze: &mut Maze, seed: u64) -> usize {
    let mut rng = get_rng(Some(seed));
    recursive_backtrack(maze, &mut rng)
}
