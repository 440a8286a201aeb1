pub mod cell;
pub mod grid;

pub use cell::{Cell, Coord, Direction};
use grid::Grid;

/// A rectangular maze of walled cells.
///
/// Walls are stored on both sides of every shared edge and are only ever
/// changed in pairs, so `has_wall_between(a, b) == has_wall_between(b, a)`
/// holds at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    grid: Grid<Cell>,
}

impl Maze {
    /// Creates a new maze with every wall present.
    pub fn new(rows: u16, cols: u16) -> Self {
        Maze {
            grid: Grid::new(rows, cols, Cell::WALLED),
        }
    }

    /// Returns the number of rows in the maze.
    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    /// Returns the number of columns in the maze.
    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    /// Checks if the maze has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        self.grid.is_in_bounds(coord)
    }

    /// Iterates every coordinate of the maze in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        self.grid.coords()
    }

    pub fn cell_at(&self, coord: Coord) -> Option<&Cell> {
        self.grid.get(coord)
    }

    pub(crate) fn cell_at_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.grid.get_mut(coord)
    }

    /// Get neighbors of a cell, in North, East, South, West order.
    /// A neighbor is one step away in a cardinal direction and inside the maze;
    /// walls are ignored.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        // No neighbors if the coordinate is out of bounds
        let origin = self.is_in_bounds(coord).then_some(coord);
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| origin?.step(direction))
            .filter(|&c| self.is_in_bounds(c))
    }

    /// Neighbors reachable from `coord` without crossing a wall, in North, East, South, West order.
    pub fn open_passages(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.neighbors(coord)
            .filter(move |&neighbor| !self.has_wall_between(coord, neighbor))
    }

    /// Whether movement between `a` and `b` is blocked.
    ///
    /// Only meaningful for orthogonal neighbors. Any other pair, including
    /// out-of-bounds or identical coordinates, reports `true`.
    pub fn has_wall_between(&self, a: Coord, b: Coord) -> bool {
        match (a.direction_to(b), self.cell_at(a), self.is_in_bounds(b)) {
            (Some(direction), Some(cell), true) => cell.has_wall(direction),
            _ => true,
        }
    }

    /// Removes the wall shared by two adjacent cells, on both sides.
    ///
    /// Returns `true` if a wall was removed, `false` if the passage was
    /// already open or the cells are not adjacent.
    pub fn remove_wall_between(&mut self, a: Coord, b: Coord) -> bool {
        self.set_wall_between(a, b, false)
    }

    /// Restores the wall shared by two adjacent cells, on both sides.
    ///
    /// Returns `true` if a wall was added.
    pub fn insert_wall_between(&mut self, a: Coord, b: Coord) -> bool {
        self.set_wall_between(a, b, true)
    }

    fn set_wall_between(&mut self, a: Coord, b: Coord, present: bool) -> bool {
        let Some(direction) = a.direction_to(b) else {
            return false;
        };
        if !self.is_in_bounds(a) || !self.is_in_bounds(b) {
            return false;
        }
        let changed = self.grid[a].has_wall(direction) != present;
        self.grid[a].set_wall(direction, present);
        self.grid[b].set_wall(direction.opposite(), present);
        changed
    }

    /// Puts every wall back and clears generation state.
    pub fn reset_all(&mut self) {
        self.grid.fill(Cell::WALLED);
    }

    /// Number of open passages between adjacent cells. Each passage is counted once.
    pub fn open_edge_count(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter_map(|direction| coord.step(direction))
                    .filter(|&neighbor| {
                        self.is_in_bounds(neighbor) && !self.has_wall_between(coord, neighbor)
                    })
                    .count()
            })
            .sum()
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_maze_is_fully_walled() {
        let maze = Maze::new(4, 5);
        assert_eq!(maze.open_edge_count(), 0);
        assert!(maze.coords().all(|c| maze[c] == Cell::WALLED));
    }

    #[test]
    fn test_neighbors_order_and_bounds() {
        let maze = Maze::new(3, 3);
        let center = maze.neighbors(Coord::new(1, 1)).collect::<Vec<_>>();
        assert_eq!(
            center,
            vec![
                Coord::new(0, 1),
                Coord::new(1, 2),
                Coord::new(2, 1),
                Coord::new(1, 0)
            ]
        );
        let corner = maze.neighbors(Coord::new(2, 2)).collect::<Vec<_>>();
        assert_eq!(corner, vec![Coord::new(1, 2), Coord::new(2, 1)]);
        assert_eq!(maze.neighbors(Coord::new(3, 0)).count(), 0);
    }

    #[test]
    fn test_remove_wall() {
        let mut maze = Maze::new(5, 5);
        let a = Coord::new(1, 1);
        let b = Coord::new(1, 2);
        assert!(maze.remove_wall_between(a, b));
        // Trying to remove the same wall again should return false
        assert!(!maze.remove_wall_between(b, a));
        assert!(!maze.has_wall_between(a, b));
        assert!(!maze.has_wall_between(b, a));
        assert!(!maze[a].has_wall(Direction::East));
        assert!(!maze[b].has_wall(Direction::West));
        assert_eq!(maze.open_edge_count(), 1);
    }

    #[test]
    fn test_non_adjacent_is_blocked() {
        let mut maze = Maze::new(3, 3);
        let a = Coord::new(0, 0);
        assert!(!maze.remove_wall_between(a, Coord::new(1, 1)));
        assert!(!maze.remove_wall_between(a, a));
        assert!(maze.has_wall_between(a, Coord::new(1, 1)));
        assert!(maze.has_wall_between(a, Coord::new(0, 2)));
        assert!(maze.has_wall_between(a, a));
        assert!(maze.has_wall_between(Coord::new(2, 2), Coord::new(2, 3)));
    }

    #[test]
    fn test_open_passages() {
        let mut maze = Maze::new(3, 3);
        let center = Coord::new(1, 1);
        maze.remove_wall_between(center, Coord::new(2, 1));
        maze.remove_wall_between(center, Coord::new(0, 1));
        let open = maze.open_passages(center).collect::<Vec<_>>();
        assert_eq!(open, vec![Coord::new(0, 1), Coord::new(2, 1)]);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut maze = Maze::new(3, 3);
        maze.remove_wall_between(Coord::new(0, 0), Coord::new(0, 1));
        maze.reset_all();
        let once = maze.clone();
        maze.reset_all();
        assert_eq!(maze, once);
        assert_eq!(maze, Maze::new(3, 3));
    }

    #[test]
    fn test_insert_wall() {
        let mut maze = Maze::new(2, 2);
        let a = Coord::new(0, 0);
        let b = Coord::new(1, 0);
        maze.remove_wall_between(a, b);
        assert!(maze.insert_wall_between(b, a));
        assert!(maze.has_wall_between(a, b));
        assert!(!maze.insert_wall_between(a, b));
    }
}
