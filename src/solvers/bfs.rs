use std::collections::VecDeque;

use super::Frontier;
use crate::maze::Coord;

/// First in, first out. Expands cells in order of distance from the start,
/// so the first time the goal is popped it was reached by a shortest route.
#[derive(Debug, Default)]
pub struct Queue {
    cells: VecDeque<Coord>,
}

impl Frontier for Queue {
    fn push(&mut self, coord: Coord, _cost: u32) {
        self.cells.push_back(coord);
    }

    fn pop(&mut self) -> Option<Coord> {
        self.cells.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = Queue::default();
        queue.push(Coord::new(0, 0), 0);
        queue.push(Coord::new(0, 1), 1);
        queue.push(Coord::new(1, 1), 2);
        assert_eq!(queue.pop(), Some(Coord::new(0, 0)));
        assert_eq!(queue.pop(), Some(Coord::new(0, 1)));
        assert_eq!(queue.pop(), Some(Coord::new(1, 1)));
        assert_eq!(queue.pop(), None);
        assert!(!queue.relaxes());
    }
}
