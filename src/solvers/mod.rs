mod astar;
mod bfs;
mod dfs;
pub mod emitter;
pub mod trace;

use std::time::{Duration, Instant};

use crate::maze::{Coord, Maze, grid::Grid};
use astar::OpenSet;
use bfs::Queue;
use dfs::Stack;
pub use emitter::{ChannelEmitter, Pacing, SolveEvent, StepSink};
pub use trace::SearchTrace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Bfs,
    Dfs,
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 3] = [Solver::Bfs, Solver::Dfs, Solver::AStar];
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::AStar => write!(f, "A* Search"),
        }
    }
}

/// Which half of a solve produced a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// A cell was discovered or relaxed during the forward search.
    Exploring,
    /// A cell lies on the path walked back from the end to the start.
    Reconstructing,
}

/// One incremental change reported while solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub coord: Coord,
    pub phase: Phase,
}

impl StepEvent {
    pub fn exploring(coord: Coord) -> Self {
        StepEvent {
            coord,
            phase: Phase::Exploring,
        }
    }

    pub fn reconstructing(coord: Coord) -> Self {
        StepEvent {
            coord,
            phase: Phase::Reconstructing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The end cell was reached and the path reconstructed.
    Reached,
    /// The frontier ran dry before reaching the end cell.
    Unreachable,
    /// The step sink asked the search to stop.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub solver: Solver,
    pub status: SolveStatus,
    /// Cells from start to end inclusive. Empty unless `status` is `Reached`.
    pub path: Vec<Coord>,
    /// Number of discovery or relaxation steps emitted.
    pub explored: usize,
    pub elapsed: Duration,
}

impl SolveOutcome {
    pub fn is_reached(&self) -> bool {
        self.status == SolveStatus::Reached
    }

    /// Number of edges on the path, if one was found.
    pub fn path_edges(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }
}

/// The container holding cells waiting to be expanded.
///
/// All three solvers share one traversal loop and differ only in the order
/// their frontier hands cells back.
pub trait Frontier {
    /// Adds a newly discovered or relaxed cell with its cost from the start.
    fn push(&mut self, coord: Coord, cost: u32);

    /// Takes the next cell to expand.
    fn pop(&mut self) -> Option<Coord>;

    /// Whether a cell that already has a cost may be pushed again when a
    /// strictly cheaper route to it is found.
    fn relaxes(&self) -> bool {
        false
    }
}

/// Solve the maze from `start` to `goal`, reporting every step to `sink`.
///
/// Exploration steps are emitted in discovery order. If the goal is
/// reached, the path is then emitted from goal back to start.
///
/// A `start` or `goal` outside the maze has no route to it, so the solve
/// ends as `Unreachable` without emitting anything. `MazeEngine` rejects
/// such endpoints before they get here.
pub fn solve_maze<S: StepSink + ?Sized>(
    maze: &Maze,
    solver: Solver,
    start: Coord,
    goal: Coord,
    sink: &mut S,
) -> SolveOutcome {
    tracing::info!(%solver, %start, %goal, "Solving maze");
    let started = Instant::now();
    let result = match solver {
        Solver::Bfs => traverse(maze, start, goal, Queue::default(), sink),
        Solver::Dfs => traverse(maze, start, goal, Stack::default(), sink),
        Solver::AStar => traverse(maze, start, goal, OpenSet::new(goal), sink),
    };
    let outcome = SolveOutcome {
        solver,
        status: result.status,
        path: result.path,
        explored: result.explored,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        %solver,
        status = ?outcome.status,
        explored = outcome.explored,
        path_len = outcome.path.len(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Solve finished"
    );
    outcome
}

struct Traversal {
    status: SolveStatus,
    path: Vec<Coord>,
    explored: usize,
}

impl Traversal {
    fn stopped(status: SolveStatus, explored: usize) -> Self {
        Traversal {
            status,
            path: Vec::new(),
            explored,
        }
    }
}

fn traverse<F: Frontier, S: StepSink + ?Sized>(
    maze: &Maze,
    start: Coord,
    goal: Coord,
    mut frontier: F,
    sink: &mut S,
) -> Traversal {
    if !maze.is_in_bounds(start) || !maze.is_in_bounds(goal) {
        return Traversal::stopped(SolveStatus::Unreachable, 0);
    }

    let (rows, cols) = (maze.rows(), maze.cols());
    // Cheapest known cost from the start, per cell
    let mut costs: Grid<Option<u32>> = Grid::new(rows, cols, None);
    // The cell each cell was last reached from
    let mut parents: Grid<Option<Coord>> = Grid::new(rows, cols, None);
    // Cells that have already been expanded
    let mut closed = Grid::new(rows, cols, false);

    costs[start] = Some(0);
    frontier.push(start, 0);
    let mut explored = 0;
    let mut reached = false;

    while let Some(current) = frontier.pop() {
        // Stale entry left behind by a relaxation
        if closed[current] {
            continue;
        }
        if current == goal {
            reached = true;
            break;
        }
        closed[current] = true;

        let Some(cost) = costs[current] else {
            continue;
        };
        let next_cost = cost + 1;

        for neighbor in maze.open_passages(current) {
            if closed[neighbor] {
                continue;
            }
            let improves = match costs[neighbor] {
                None => true,
                Some(known) => frontier.relaxes() && next_cost < known,
            };
            if !improves {
                continue;
            }

            costs[neighbor] = Some(next_cost);
            parents[neighbor] = Some(current);
            explored += 1;
            if sink.emit(StepEvent::exploring(neighbor)).is_break() {
                tracing::debug!(explored, "Search cancelled while exploring");
                return Traversal::stopped(SolveStatus::Cancelled, explored);
            }
            frontier.push(neighbor, next_cost);
        }
    }

    if !reached {
        tracing::debug!(explored, "Frontier exhausted before reaching the goal");
        return Traversal::stopped(SolveStatus::Unreachable, explored);
    }

    // Walk back from the goal, emitting each cell on the way
    let mut path = Vec::new();
    let mut step = Some(goal);
    while let Some(coord) = step {
        path.push(coord);
        if sink.emit(StepEvent::reconstructing(coord)).is_break() {
            tracing::debug!(explored, "Search cancelled while reconstructing");
            return Traversal::stopped(SolveStatus::Cancelled, explored);
        }
        step = parents[coord];
    }
    path.reverse();

    Traversal {
        status: SolveStatus::Reached,
        path,
        explored,
    }
}
