use super::{Phase, StepEvent};
use crate::maze::{Coord, grid::Grid};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// Reached at some point during exploration.
    pub discovered: bool,
    /// Part of the reconstructed route from start to end.
    pub on_solution_path: bool,
}

/// Render-side record of what a solve has reported so far.
///
/// Built only from [`StepEvent`]s, so the consumer never reads state the
/// solver thread is writing.
#[derive(Debug, Clone)]
pub struct SearchTrace {
    marks: Grid<Mark>,
    discovered: usize,
    solution_len: usize,
}

impl SearchTrace {
    pub fn new(rows: u16, cols: u16) -> Self {
        SearchTrace {
            marks: Grid::new(rows, cols, Mark::default()),
            discovered: 0,
            solution_len: 0,
        }
    }

    /// Forget every mark, ready for the next solve.
    pub fn clear(&mut self) {
        self.marks.fill(Mark::default());
        self.discovered = 0;
        self.solution_len = 0;
    }

    /// Record a step. Returns the new mark of the cell if it changed.
    pub fn apply(&mut self, event: &StepEvent) -> Option<Mark> {
        let mark = self.marks.get_mut(event.coord)?;
        let before = *mark;
        match event.phase {
            Phase::Exploring => mark.discovered = true,
            Phase::Reconstructing => mark.on_solution_path = true,
        }
        let after = *mark;
        if !before.discovered && after.discovered {
            self.discovered += 1;
        }
        if !before.on_solution_path && after.on_solution_path {
            self.solution_len += 1;
        }
        (before != after).then_some(after)
    }

    pub fn mark(&self, coord: Coord) -> Mark {
        self.marks.get(coord).copied().unwrap_or_default()
    }

    pub fn is_discovered(&self, coord: Coord) -> bool {
        self.mark(coord).discovered
    }

    pub fn is_on_solution_path(&self, coord: Coord) -> bool {
        self.mark(coord).on_solution_path
    }

    /// Single "on path" view that does not tell exploration and solution
    /// apart, for renderers that draw both the same way.
    pub fn is_marked(&self, coord: Coord) -> bool {
        let mark = self.mark(coord);
        mark.discovered || mark.on_solution_path
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered
    }

    pub fn solution_len(&self) -> usize {
        self.solution_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_set_distinct_flags() {
        let mut trace = SearchTrace::new(3, 3);
        let a = Coord::new(0, 1);
        let b = Coord::new(1, 1);

        assert!(trace.apply(&StepEvent::exploring(a)).is_some());
        assert!(trace.apply(&StepEvent::reconstructing(b)).is_some());

        assert!(trace.is_discovered(a));
        assert!(!trace.is_on_solution_path(a));
        assert!(trace.is_on_solution_path(b));
        assert!(!trace.is_discovered(b));
        assert!(trace.is_marked(a) && trace.is_marked(b));
        assert!(!trace.is_marked(Coord::new(2, 2)));
    }

    #[test]
    fn test_repeat_step_is_not_a_change() {
        let mut trace = SearchTrace::new(2, 2);
        let cell = Coord::new(1, 0);
        assert!(trace.apply(&StepEvent::exploring(cell)).is_some());
        assert!(trace.apply(&StepEvent::exploring(cell)).is_none());
        assert_eq!(trace.discovered_count(), 1);
        let mark = trace.apply(&StepEvent::reconstructing(cell)).unwrap();
        assert!(mark.discovered && mark.on_solution_path);
        assert_eq!(trace.solution_len(), 1);
    }

    #[test]
    fn test_out_of_bounds_step_is_ignored() {
        let mut trace = SearchTrace::new(2, 2);
        assert!(trace.apply(&StepEvent::exploring(Coord::new(5, 5))).is_none());
        assert_eq!(trace.discovered_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut trace = SearchTrace::new(2, 2);
        trace.apply(&StepEvent::exploring(Coord::new(0, 0)));
        trace.apply(&StepEvent::reconstructing(Coord::new(0, 1)));
        trace.clear();
        assert_eq!(trace.discovered_count(), 0);
        assert_eq!(trace.solution_len(), 0);
        assert!(!trace.is_marked(Coord::new(0, 0)));
        assert!(!trace.is_marked(Coord::new(0, 1)));
    }
}
