use std::{cmp::Reverse, collections::BinaryHeap};

use super::Frontier;
use crate::maze::Coord;

/// Min-priority frontier ordered by `f = g + h`, where `h` is the Manhattan
/// distance to the goal.
///
/// With unit edge costs the heuristic is admissible and consistent, so the
/// goal is popped with an optimal cost. Cells may be pushed more than once
/// when relaxed; the traversal skips entries for cells already expanded.
#[derive(Debug)]
pub struct OpenSet {
    goal: Coord,
    // Using Reverse to turn the max-heap into a min-heap.
    // Ties on f fall back to insertion order.
    heap: BinaryHeap<Reverse<(u32, u64, Coord)>>,
    pushed: u64,
}

impl OpenSet {
    pub fn new(goal: Coord) -> Self {
        OpenSet {
            goal,
            heap: BinaryHeap::new(),
            pushed: 0,
        }
    }

    fn heuristic(&self, coord: Coord) -> u32 {
        coord.manhattan(self.goal)
    }
}

impl Frontier for OpenSet {
    fn push(&mut self, coord: Coord, cost: u32) {
        let priority = cost + self.heuristic(coord);
        self.heap.push(Reverse((priority, self.pushed, coord)));
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<Coord> {
        self.heap.pop().map(|Reverse((_, _, coord))| coord)
    }

    fn relaxes(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_lowest_f_first() {
        let goal = Coord::new(4, 4);
        let mut open = OpenSet::new(goal);
        // f = 1 + 8 = 9
        open.push(Coord::new(0, 0), 1);
        // f = 3 + 2 = 5
        open.push(Coord::new(3, 3), 3);
        // f = 2 + 5 = 7
        open.push(Coord::new(1, 3), 2);
        assert_eq!(open.pop(), Some(Coord::new(3, 3)));
        assert_eq!(open.pop(), Some(Coord::new(1, 3)));
        assert_eq!(open.pop(), Some(Coord::new(0, 0)));
        assert_eq!(open.pop(), None);
    }

    #[test]
    fn test_cheaper_reinsert_wins() {
        let mut open = OpenSet::new(Coord::new(0, 5));
        let cell = Coord::new(0, 2);
        open.push(cell, 6);
        open.push(Coord::new(0, 1), 4);
        open.push(cell, 2);
        assert_eq!(open.pop(), Some(cell));
        assert!(open.relaxes());
    }
}
