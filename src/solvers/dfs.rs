use super::Frontier;
use crate::maze::Coord;

/// Last in, first out. The most recently discovered cell is expanded next.
#[derive(Debug, Default)]
pub struct Stack {
    cells: Vec<Coord>,
}

impl Frontier for Stack {
    fn push(&mut self, coord: Coord, _cost: u32) {
        self.cells.push(coord);
    }

    fn pop(&mut self) -> Option<Coord> {
        self.cells.pop()
    }
}
