mod renderer;

use std::{
    io::{Stdout, Write},
    sync::mpsc::TryRecvError,
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind},
    queue,
    terminal::{self, ClearType},
};

pub use renderer::{Glyph, PathView, Renderer, Scene};

use crate::{
    config::{Config, Speed},
    engine::{MazeEngine, SolveStream},
    maze::{Coord, Direction},
    solvers::{SearchTrace, SolveEvent, SolveOutcome, SolveStatus, Solver},
};

/// Timeout for polling input events, a.k.a. how often pending solve steps are drawn
const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(16);
/// Maximum number of solve events drawn between two input polls
const MAX_EVENTS_PER_FRAME: usize = 256;

const HELP: &str = "Arrows: move  Enter: pick start/end  g: generate  r: reset  b/d/a: BFS/DFS/A*  +/-: speed  p: path view  Esc: exit";

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Which endpoint the next Enter press picks, like clicking cells in turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selecting {
    Start,
    End,
    Done,
}

/// What the user asked for with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    Move(Direction),
    Pick,
    SetStart,
    SetEnd,
    Generate,
    Reset,
    Solve(Solver),
    SpeedUp,
    SlowDown,
    ToggleView,
    Exit,
}

impl UserAction {
    fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let action = match key.code {
            KeyCode::Up => UserAction::Move(Direction::North),
            KeyCode::Right => UserAction::Move(Direction::East),
            KeyCode::Down => UserAction::Move(Direction::South),
            KeyCode::Left => UserAction::Move(Direction::West),
            KeyCode::Enter | KeyCode::Char(' ') => UserAction::Pick,
            KeyCode::Char('s') => UserAction::SetStart,
            KeyCode::Char('e') => UserAction::SetEnd,
            KeyCode::Char('g') => UserAction::Generate,
            KeyCode::Char('r') => UserAction::Reset,
            KeyCode::Char('b') => UserAction::Solve(Solver::Bfs),
            KeyCode::Char('d') => UserAction::Solve(Solver::Dfs),
            KeyCode::Char('a') => UserAction::Solve(Solver::AStar),
            KeyCode::Char('+') | KeyCode::Char('=') => UserAction::SpeedUp,
            KeyCode::Char('-') => UserAction::SlowDown,
            KeyCode::Char('p') => UserAction::ToggleView,
            KeyCode::Esc | KeyCode::Char('q') => UserAction::Exit,
            _ => return None,
        };
        Some(action)
    }
}

/// Front-end state: everything the terminal shows that the engine does not own.
pub struct App {
    engine: MazeEngine,
    trace: SearchTrace,
    renderer: Renderer,
    stream: Option<SolveStream>,
    cursor: Coord,
    selecting: Selecting,
    speed: Speed,
    view: PathView,
    /// When the running solve was started, for the live timer
    solve_started: Option<Instant>,
    last_outcome: Option<SolveOutcome>,
    message: String,
    /// Whether the last full redraw fit the terminal
    visible: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let speed = config.speed;
        let trace = SearchTrace::new(config.rows, config.cols);
        Self {
            engine: MazeEngine::new(config),
            trace,
            renderer: Renderer::new(),
            stream: None,
            cursor: Coord::new(0, 0),
            selecting: Selecting::Start,
            speed,
            view: PathView::Split,
            solve_started: None,
            last_outcome: None,
            message: HELP.to_string(),
            visible: false,
        }
    }

    /// Main loop: alternate between reading input and drawing pending solve steps
    pub fn run(&mut self) -> std::io::Result<()> {
        tracing::info!("Started main app loop");
        self.engine.generate_maze(None);
        self.redraw()?;

        loop {
            if event::poll(INPUT_POLL_TIMEOUT)? {
                match event::read()? {
                    event::Event::Key(key) => {
                        if let Some(action) = UserAction::from_key(key) {
                            if action == UserAction::Exit {
                                break;
                            }
                            self.handle_action(action)?;
                        }
                    }
                    event::Event::Resize(_, _) => self.redraw()?,
                    _ => {}
                }
            }
            self.drain_solve_events()?;
            self.draw_status()?;
        }

        // Stop any running solve before leaving
        self.engine.cancel_solve();
        tracing::info!("Exiting main app loop");
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> std::io::Result<()> {
        tracing::debug!(?action, "User action");
        match action {
            UserAction::Move(direction) => {
                let Some(next) = self
                    .cursor
                    .step(direction)
                    .filter(|&c| self.engine.maze().is_in_bounds(c))
                else {
                    return Ok(());
                };
                let previous = std::mem::replace(&mut self.cursor, next);
                self.draw_cell(previous)?;
                self.draw_cell(next)?;
            }
            UserAction::Pick => match self.selecting {
                Selecting::Start => self.handle_action(UserAction::SetStart)?,
                Selecting::End => self.handle_action(UserAction::SetEnd)?,
                Selecting::Done => {
                    self.message = "Start and end are set. Press s/e to move them.".to_string()
                }
            },
            UserAction::SetStart => {
                let previous = self.engine.start();
                match self.engine.set_start(self.cursor) {
                    Ok(()) => {
                        if self.selecting == Selecting::Start {
                            self.selecting = Selecting::End;
                        }
                        self.message = format!("Start set to {}", self.cursor);
                        if let Some(previous) = previous {
                            self.draw_cell(previous)?;
                        }
                    }
                    Err(e) => self.message = e.to_string(),
                }
            }
            UserAction::SetEnd => {
                let previous = self.engine.end();
                match self.engine.set_end(self.cursor) {
                    Ok(()) => {
                        self.selecting = Selecting::Done;
                        self.message = format!("End set to {}", self.cursor);
                        if let Some(previous) = previous {
                            self.draw_cell(previous)?;
                        }
                    }
                    Err(e) => self.message = e.to_string(),
                }
            }
            UserAction::Generate => {
                self.stream = None;
                let seed = self.engine.generate_maze(None);
                self.after_maze_change(format!("Generated maze with seed {}", seed))?;
            }
            UserAction::Reset => {
                self.stream = None;
                self.engine.reset_maze();
                self.after_maze_change("Maze reset. Press g to generate.".to_string())?;
            }
            UserAction::Solve(solver) => match self.engine.solve(solver, self.speed) {
                Ok(stream) => {
                    self.trace.clear();
                    self.stream = Some(stream);
                    self.solve_started = Some(Instant::now());
                    self.last_outcome = None;
                    self.message = format!("Solving with {}", solver);
                    self.redraw()?;
                }
                Err(e) => self.message = e.to_string(),
            },
            UserAction::SpeedUp => self.speed = self.speed.faster(),
            UserAction::SlowDown => self.speed = self.speed.slower(),
            UserAction::ToggleView => {
                self.view = self.view.toggled();
                self.redraw()?;
            }
            UserAction::Exit => {}
        }
        Ok(())
    }

    fn after_maze_change(&mut self, message: String) -> std::io::Result<()> {
        self.trace.clear();
        self.selecting = Selecting::Start;
        self.solve_started = None;
        self.last_outcome = None;
        self.message = message;
        self.redraw()
    }

    /// Apply up to a frame's worth of solve events to the trace and draw what changed
    fn drain_solve_events(&mut self) -> std::io::Result<()> {
        for _ in 0..MAX_EVENTS_PER_FRAME {
            let Some(stream) = &self.stream else {
                return Ok(());
            };
            match stream.try_next() {
                Ok(SolveEvent::Step(step)) => {
                    if self.trace.apply(&step).is_some() {
                        self.draw_cell(step.coord)?;
                    }
                }
                Ok(SolveEvent::Finished(outcome)) => {
                    self.message = match outcome.status {
                        SolveStatus::Reached => format!(
                            "Path found: {} cells, {} explored",
                            outcome.path.len(),
                            outcome.explored
                        ),
                        SolveStatus::Unreachable => "No path found.".to_string(),
                        SolveStatus::Cancelled => "Solve cancelled.".to_string(),
                    };
                    self.last_outcome = Some(outcome);
                    self.stream = None;
                }
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => {
                    // Solve thread has exited without an outcome
                    self.stream = None;
                }
            }
        }
        Ok(())
    }

    fn redraw(&mut self) -> std::io::Result<()> {
        let scene = scene_of(&self.engine, &self.trace, self.cursor, self.view);
        self.visible = self.renderer.draw_full(&scene)?;
        Ok(())
    }

    fn draw_cell(&mut self, coord: Coord) -> std::io::Result<()> {
        if !self.visible {
            return Ok(());
        }
        let scene = scene_of(&self.engine, &self.trace, self.cursor, self.view);
        self.renderer.draw_cell(&scene, coord)
    }

    fn draw_status(&mut self) -> std::io::Result<()> {
        if !self.visible {
            return Ok(());
        }
        let status = self.status_line();
        let message = self.message.clone();
        let scene = scene_of(&self.engine, &self.trace, self.cursor, self.view);
        self.renderer.draw_status(&scene, &status, &message)
    }

    fn status_line(&self) -> String {
        let elapsed = match (&self.last_outcome, self.solve_started) {
            (Some(outcome), _) => outcome.elapsed,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        };
        let solver = self
            .last_outcome
            .as_ref()
            .map(|outcome| outcome.solver)
            .or_else(|| self.stream.as_ref().map(SolveStream::solver))
            .map(|solver| solver.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = match (&self.last_outcome, &self.stream) {
            (Some(outcome), _) => format!("{:?}", outcome.status),
            (None, Some(_)) => "Running".to_string(),
            (None, None) => "Idle".to_string(),
        };
        format!(
            "Speed: {}  Solver: {}  Status: {}  Explored: {}  {}",
            self.speed,
            solver,
            status,
            self.trace.discovered_count(),
            format_elapsed(elapsed)
        )
    }
}

/// Borrows only the fields a frame needs, leaving the renderer free to borrow mutably.
fn scene_of<'a>(
    engine: &'a MazeEngine,
    trace: &'a SearchTrace,
    cursor: Coord,
    view: PathView,
) -> Scene<'a> {
    Scene {
        maze: engine.maze(),
        trace,
        start: engine.start(),
        end: engine.end(),
        cursor,
        view,
    }
}

/// Elapsed time as `Time: S.mmm s`.
fn format_elapsed(elapsed: Duration) -> String {
    format!(
        "Time: {}.{:03} s",
        elapsed.as_secs(),
        elapsed.subsec_millis()
    )
}

/// Entry point of the terminal front-end
pub fn run(stdout: &mut Stdout, config: Config) -> std::io::Result<()> {
    setup_terminal(stdout)?;
    let result = App::new(config).run();
    restore_terminal(stdout)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_key_mapping() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(
            UserAction::from_key(press(KeyCode::Up)),
            Some(UserAction::Move(Direction::North))
        );
        assert_eq!(
            UserAction::from_key(press(KeyCode::Char('a'))),
            Some(UserAction::Solve(Solver::AStar))
        );
        assert_eq!(
            UserAction::from_key(press(KeyCode::Esc)),
            Some(UserAction::Exit)
        );
        assert_eq!(UserAction::from_key(press(KeyCode::Char('z'))), None);

        let mut release = press(KeyCode::Char('g'));
        release.kind = KeyEventKind::Release;
        assert_eq!(UserAction::from_key(release), None);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "Time: 0.000 s");
        assert_eq!(format_elapsed(Duration::from_millis(12_345)), "Time: 12.345 s");
    }
}
