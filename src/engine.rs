use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, TryRecvError},
    },
    thread::JoinHandle,
};

use rand::Rng;

use crate::{
    config::{Config, Speed},
    error::{EngineError, Result},
    generators::generate_maze,
    maze::{Coord, Maze},
    solvers::{ChannelEmitter, Pacing, SolveEvent, SolveOutcome, Solver, StepSink, solve_maze},
};

/// The solve currently running on a background thread.
struct SolveTask {
    solver: Solver,
    cancel: Arc<AtomicBool>,
    /// Set by the worker once the outcome has been handed to the stream
    done: Arc<AtomicBool>,
    handle: JoinHandle<SolveOutcome>,
}

/// Receiving end of a background solve.
///
/// Yields every step in order, then a single [`SolveEvent::Finished`].
/// Iterating blocks until the next event arrives and ends when the solve
/// thread is gone.
pub struct SolveStream {
    solver: Solver,
    events: Receiver<SolveEvent>,
}

impl SolveStream {
    pub fn solver(&self) -> Solver {
        self.solver
    }

    /// Next event without blocking.
    pub fn try_next(&self) -> std::result::Result<SolveEvent, TryRecvError> {
        self.events.try_recv()
    }
}

impl Iterator for SolveStream {
    type Item = SolveEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.recv().ok()
    }
}

/// Owns the maze, the chosen endpoints and at most one running solve.
///
/// Every operation that changes the maze first cancels and joins the
/// running solve, so no stale step can arrive after a regenerate or reset.
pub struct MazeEngine {
    config: Config,
    maze: Maze,
    start: Option<Coord>,
    end: Option<Coord>,
    generated: bool,
    task: Option<SolveTask>,
}

impl MazeEngine {
    pub fn new(config: Config) -> Self {
        let maze = Maze::new(config.rows, config.cols);
        Self {
            config,
            maze,
            start: None,
            end: None,
            generated: false,
            task: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether a background solve is still running.
    pub fn is_solving(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.done.load(Ordering::Acquire))
    }

    /// Replace the maze with a freshly carved one and clear both endpoints.
    ///
    /// Without a seed one is drawn from the OS. The seed actually used is
    /// returned and logged so the maze can be reproduced.
    pub fn generate_maze(&mut self, seed: Option<u64>) -> u64 {
        self.cancel_solve();
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let carved = generate_maze(&mut self.maze, seed);
        self.start = None;
        self.end = None;
        self.generated = true;
        tracing::info!(
            seed,
            carved,
            rows = self.maze.rows(),
            cols = self.maze.cols(),
            "Generated maze"
        );
        seed
    }

    /// Put every wall back and forget the endpoints.
    pub fn reset_maze(&mut self) {
        self.cancel_solve();
        self.maze.reset_all();
        self.start = None;
        self.end = None;
        self.generated = false;
        tracing::info!("Maze reset");
    }

    pub fn set_start(&mut self, coord: Coord) -> Result<()> {
        self.check_endpoint(coord)?;
        self.start = Some(coord);
        tracing::debug!(%coord, "Start set");
        Ok(())
    }

    pub fn set_end(&mut self, coord: Coord) -> Result<()> {
        self.check_endpoint(coord)?;
        self.end = Some(coord);
        tracing::debug!(%coord, "End set");
        Ok(())
    }

    fn check_endpoint(&self, coord: Coord) -> Result<()> {
        if !self.generated {
            return Err(EngineError::NoMazeGenerated);
        }
        if !self.maze.is_in_bounds(coord) {
            return Err(EngineError::OutOfBounds {
                coord,
                rows: self.maze.rows(),
                cols: self.maze.cols(),
            });
        }
        Ok(())
    }

    /// Validate that a solve may start now and return its endpoints.
    fn ready_to_solve(&mut self) -> Result<(Coord, Coord)> {
        if !self.generated {
            return Err(EngineError::NoMazeGenerated);
        }
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(EngineError::InvalidEndpoint);
        };
        if self.is_solving() {
            return Err(EngineError::SolveInProgress);
        }
        // A done task has already handed its outcome to the stream, reap it
        self.cancel_solve();
        Ok((start, end))
    }

    /// Start solving on a background thread.
    ///
    /// The solver works on its own copy of the maze and reports through the
    /// returned stream, pacing each step according to `speed`.
    pub fn solve(&mut self, solver: Solver, speed: Speed) -> Result<SolveStream> {
        let (start, end) = self.ready_to_solve()?;

        let (tx, rx) = std::sync::mpsc::sync_channel::<SolveEvent>(self.config.event_buffer);
        let cancel = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicBool::new(false));
        let done_for_worker = done.clone();
        let pacing = Pacing::new(speed, &self.config);
        let mut emitter = ChannelEmitter::new(tx, cancel.clone(), pacing, self.config.send_poll);
        let maze = self.maze.clone();

        tracing::info!(%solver, %speed, "Spawning solve thread");
        let handle = std::thread::spawn(move || {
            let outcome = solve_maze(&maze, solver, start, end, &mut emitter);
            emitter.finish(outcome.clone());
            // Marked done only once the outcome is handed off, and before the
            // sender is dropped, so a consumer that sees the stream end never
            // finds the task still running
            done_for_worker.store(true, Ordering::Release);
            drop(emitter);
            outcome
        });

        self.task = Some(SolveTask {
            solver,
            cancel,
            done,
            handle,
        });
        Ok(SolveStream {
            solver,
            events: rx,
        })
    }

    /// Solve on the calling thread, reporting steps straight to `sink`.
    pub fn solve_blocking<S: StepSink + ?Sized>(
        &mut self,
        solver: Solver,
        sink: &mut S,
    ) -> Result<SolveOutcome> {
        let (start, end) = self.ready_to_solve()?;
        Ok(solve_maze(&self.maze, solver, start, end, sink))
    }

    /// Stop the background solve, if any, and wait for its thread to exit.
    /// Returns the outcome it finished with.
    pub fn cancel_solve(&mut self) -> Option<SolveOutcome> {
        let task = self.task.take()?;
        task.cancel.store(true, Ordering::Release);
        match task.handle.join() {
            Ok(outcome) => {
                tracing::debug!(solver = %task.solver, status = ?outcome.status, "Solve task joined");
                Some(outcome)
            }
            Err(_) => {
                tracing::error!(solver = %task.solver, "Solve thread panicked");
                None
            }
        }
    }
}

impl Drop for MazeEngine {
    fn drop(&mut self) {
        self.cancel_solve();
    }
}
