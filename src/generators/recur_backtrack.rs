use crate::maze::{Coord, Maze};
use rand::Rng;

/// Carve a perfect maze with an iterative randomized depth-first search.
///
/// Every wall is put back first, so any previous maze is discarded. Returns
/// the number of passages opened, which is `rows * cols - 1` for a
/// non-empty maze.
pub fn recursive_backtrack<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) -> usize {
    maze.reset_all();
    if maze.is_empty() {
        return 0;
    }

    // Initialize the starting point
    let start = Coord::new(
        rng.random_range(0..maze.rows()),
        rng.random_range(0..maze.cols()),
    );
    mark_visited(maze, start);

    // The stack holds the current carving route, from the start cell to the cell being extended
    let mut stack = vec![start];
    let mut carved = 0;

    while let Some(&current) = stack.last() {
        let unvisited = maze
            .neighbors(current)
            .filter(|&c| maze.cell_at(c).is_some_and(|cell| !cell.visited_during_generation))
            .collect::<Vec<_>>();

        if unvisited.is_empty() {
            // Dead end, backtrack
            stack.pop();
            continue;
        }

        let next = unvisited[rng.random_range(0..unvisited.len())];
        mark_visited(maze, next);
        if maze.remove_wall_between(current, next) {
            carved += 1;
        }
        stack.push(next);
    }

    tracing::debug!(
        rows = maze.rows(),
        cols = maze.cols(),
        carved,
        start = %start,
        "Carved maze"
    );
    carved
}

fn mark_visited(maze: &mut Maze, coord: Coord) {
    if let Some(cell) = maze.cell_at_mut(coord) {
        cell.visited_during_generation = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;
    use std::collections::VecDeque;

    /// Number of cells reachable from the top-left corner through open passages.
    fn reachable_count(maze: &Maze) -> usize {
        let origin = Coord::new(0, 0);
        let mut seen = vec![origin];
        let mut queue = VecDeque::from([origin]);
        while let Some(current) = queue.pop_front() {
            for next in maze.open_passages(current) {
                if !seen.contains(&next) {
                    seen.push(next);
                    queue.push_back(next);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn test_generates_spanning_tree() {
        for seed in 0..20 {
            let mut maze = Maze::new(8, 11);
            let carved = recursive_backtrack(&mut maze, &mut get_rng(Some(seed)));
            let cells = 8 * 11;
            assert_eq!(carved, cells - 1);
            assert_eq!(maze.open_edge_count(), cells - 1);
            assert_eq!(reachable_count(&maze), cells);
        }
    }

    #[test]
    fn test_walls_are_symmetric() {
        let mut maze = Maze::new(6, 6);
        recursive_backtrack(&mut maze, &mut get_rng(Some(7)));
        for a in maze.coords() {
            for b in maze.neighbors(a) {
                assert_eq!(maze.has_wall_between(a, b), maze.has_wall_between(b, a));
            }
        }
    }

    #[test]
    fn test_every_cell_visited() {
        let mut maze = Maze::new(5, 9);
        recursive_backtrack(&mut maze, &mut get_rng(Some(3)));
        assert!(maze.coords().all(|c| maze[c].visited_during_generation));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let mut first = Maze::new(5, 5);
        let mut second = Maze::new(5, 5);
        recursive_backtrack(&mut first, &mut get_rng(Some(42)));
        recursive_backtrack(&mut second, &mut get_rng(Some(42)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_regenerate_discards_previous_maze() {
        let mut maze = Maze::new(7, 7);
        recursive_backtrack(&mut maze, &mut get_rng(Some(1)));
        recursive_backtrack(&mut maze, &mut get_rng(Some(2)));
        assert_eq!(maze.open_edge_count(), 7 * 7 - 1);
        assert_eq!(reachable_count(&maze), 7 * 7);
    }

    #[test]
    fn test_degenerate_sizes() {
        let mut single = Maze::new(1, 1);
        assert_eq!(recursive_backtrack(&mut single, &mut get_rng(Some(0))), 0);

        let mut corridor = Maze::new(1, 6);
        assert_eq!(recursive_backtrack(&mut corridor, &mut get_rng(Some(0))), 5);

        let mut empty = Maze::new(0, 4);
        assert_eq!(recursive_backtrack(&mut empty, &mut get_rng(Some(0))), 0);
    }
}
