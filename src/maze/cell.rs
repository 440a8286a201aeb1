use std::fmt;

/// Position of a cell in the maze, as (row, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u16,
    pub col: u16,
}

impl Coord {
    pub const fn new(row: u16, col: u16) -> Self {
        Coord { row, col }
    }

    /// The coordinate one step away in `direction`.
    /// Returns None when the step would underflow or overflow `u16`.
    /// Bounds against a concrete maze are checked by the caller.
    pub fn step(self, direction: Direction) -> Option<Coord> {
        let (row, col) = match direction {
            Direction::North => (self.row.checked_sub(1)?, self.col),
            Direction::East => (self.row, self.col.checked_add(1)?),
            Direction::South => (self.row.checked_add(1)?, self.col),
            Direction::West => (self.row, self.col.checked_sub(1)?),
        };
        Some(Coord { row, col })
    }

    /// Direction from `self` to an orthogonally adjacent `other`, if they are adjacent.
    pub fn direction_to(self, other: Coord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.step(direction) == Some(other))
    }

    /// Manhattan distance `|Δrow| + |Δcol|`.
    pub fn manhattan(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Neighbor iteration order used everywhere in the crate.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Index into [`Cell::walls`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A single maze cell: its four walls plus generation bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Indexed by [`Direction::index`]. `true` means the wall is present.
    pub walls: [bool; 4],
    /// Only meaningful while a maze is being carved.
    pub visited_during_generation: bool,
}

impl Cell {
    /// A fully walled, unvisited cell.
    pub const WALLED: Cell = Cell {
        walls: [true; 4],
        visited_during_generation: false,
    };

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    pub fn set_wall(&mut self, direction: Direction, present: bool) {
        self.walls[direction.index()] = present;
    }

    pub fn reset(&mut self) {
        *self = Cell::WALLED;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::WALLED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_saturates_at_edges() {
        let origin = Coord::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::East), Some(Coord::new(0, 1)));
        assert_eq!(origin.step(Direction::South), Some(Coord::new(1, 0)));
        assert_eq!(Coord::new(u16::MAX, 3).step(Direction::South), None);
    }

    #[test]
    fn test_direction_to() {
        let c = Coord::new(2, 2);
        assert_eq!(c.direction_to(Coord::new(1, 2)), Some(Direction::North));
        assert_eq!(c.direction_to(Coord::new(2, 3)), Some(Direction::East));
        assert_eq!(c.direction_to(Coord::new(3, 2)), Some(Direction::South));
        assert_eq!(c.direction_to(Coord::new(2, 1)), Some(Direction::West));
        assert_eq!(c.direction_to(Coord::new(3, 3)), None);
        assert_eq!(c.direction_to(c), None);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(4, 4)), 8);
        assert_eq!(Coord::new(4, 1).manhattan(Coord::new(2, 3)), 4);
    }

    #[test]
    fn test_opposite_is_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }
}
