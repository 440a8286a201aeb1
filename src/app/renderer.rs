use std::{
    fmt,
    io::{Stdout, Write},
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    maze::{Coord, Maze},
    solvers::SearchTrace,
};

/// How search marks are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathView {
    /// Explored cells and the final route look different.
    Split,
    /// Explored cells and the final route share one look.
    Merged,
}

impl PathView {
    pub fn toggled(self) -> Self {
        match self {
            PathView::Split => PathView::Merged,
            PathView::Merged => PathView::Split,
        }
    }
}

/// What a single two-column slot of the screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    Empty,
    Discovered,
    Route,
    Start,
    End,
    Cursor,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "⬜".with(Color::White),
            Glyph::Empty => "  ".with(Color::Reset),
            Glyph::Discovered => "* ".with(Color::Blue),
            Glyph::Route => "🟨".with(Color::Yellow),
            Glyph::Start => "🟩".with(Color::Green),
            Glyph::End => "🟦".with(Color::Blue),
            Glyph::Cursor => "[]".with(Color::Cyan),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Everything the renderer needs to know to draw one frame.
pub struct Scene<'a> {
    pub maze: &'a Maze,
    pub trace: &'a SearchTrace,
    pub start: Option<Coord>,
    pub end: Option<Coord>,
    pub cursor: Coord,
    pub view: PathView,
}

impl Scene<'_> {
    fn on_route(&self, coord: Coord) -> bool {
        match self.view {
            PathView::Split => self.trace.is_on_solution_path(coord),
            PathView::Merged => self.trace.is_marked(coord),
        }
    }

    fn cell_glyph(&self, coord: Coord) -> Glyph {
        if coord == self.cursor {
            return Glyph::Cursor;
        }
        if Some(coord) == self.start {
            return Glyph::Start;
        }
        if Some(coord) == self.end {
            return Glyph::End;
        }
        if self.on_route(coord) {
            Glyph::Route
        } else if self.trace.is_discovered(coord) {
            Glyph::Discovered
        } else {
            Glyph::Empty
        }
    }

    fn passage_glyph(&self, a: Coord, b: Coord) -> Glyph {
        if self.maze.has_wall_between(a, b) {
            Glyph::Wall
        } else if self.on_route(a) && self.on_route(b) {
            Glyph::Route
        } else {
            Glyph::Empty
        }
    }

    /// Glyph at a position of the (2 * rows + 1) x (2 * cols + 1) drawing grid.
    /// Odd/odd positions are cells, odd/even positions the edges between them.
    pub fn glyph_at(&self, gx: u16, gy: u16) -> Glyph {
        let (rows, cols) = (self.maze.rows(), self.maze.cols());
        let on_boundary = gx == 0 || gy == 0 || gx >= cols * 2 || gy >= rows * 2;
        match (gx % 2, gy % 2) {
            // Corners between edges
            (0, 0) => Glyph::Wall,
            _ if on_boundary => Glyph::Wall,
            (1, 1) => self.cell_glyph(Coord::new(gy / 2, gx / 2)),
            // Edge between a cell and its west neighbor
            (0, 1) => {
                let east = Coord::new(gy / 2, gx / 2);
                self.passage_glyph(Coord::new(east.row, east.col - 1), east)
            }
            // Edge between a cell and its north neighbor
            _ => {
                let south = Coord::new(gy / 2, gx / 2);
                self.passage_glyph(Coord::new(south.row - 1, south.col), south)
            }
        }
    }

    /// Drawing grid dimensions as (width, height) in glyphs.
    pub fn grid_dims(&self) -> (u16, u16) {
        (self.maze.cols() * 2 + 1, self.maze.rows() * 2 + 1)
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
}

impl Renderer {
    /// Number of terminal rows reserved below the maze for status lines
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
        }
    }

    /// Check if terminal size is sufficient for the scene.
    /// If not, replace the screen with a message asking to resize and return Ok(false).
    fn check_size(&mut self, scene: &Scene<'_>) -> std::io::Result<bool> {
        let (width, height) = scene.grid_dims();
        let (term_width, term_height) = terminal::size()?;
        if term_width < width * Glyph::WIDTH || term_height < height + Self::NUM_STATUS_ROWS {
            let msg = format!(
                "Terminal size is too small ({}x{}) for the maze ({}x{} cells). Please resize the terminal, or press Esc to exit.\r\n",
                term_width,
                term_height,
                scene.maze.cols(),
                scene.maze.rows(),
            );
            queue!(
                self.stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            )?;
            self.stdout.flush()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Redraw the whole maze.
    /// Returns Ok(false) if the terminal is too small to show it.
    pub fn draw_full(&mut self, scene: &Scene<'_>) -> std::io::Result<bool> {
        if !self.check_size(scene)? {
            return Ok(false);
        }
        let (width, height) = scene.grid_dims();
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for gy in 0..height {
            self.stdout.queue(cursor::MoveTo(0, gy))?;
            for gx in 0..width {
                self.stdout.queue(style::Print(scene.glyph_at(gx, gy)))?;
            }
        }
        self.stdout.flush()?;
        Ok(true)
    }

    /// Redraw one cell and the four edges around it.
    pub fn draw_cell(&mut self, scene: &Scene<'_>, coord: Coord) -> std::io::Result<()> {
        if !scene.maze.is_in_bounds(coord) {
            return Ok(());
        }
        let (gx, gy) = (coord.col * 2 + 1, coord.row * 2 + 1);
        for (x, y) in [
            (gx, gy),
            (gx, gy - 1),
            (gx + 1, gy),
            (gx, gy + 1),
            (gx - 1, gy),
        ] {
            queue!(
                self.stdout,
                cursor::MoveTo(x * Glyph::WIDTH, y),
                style::Print(scene.glyph_at(x, y))
            )?;
        }
        self.stdout.flush()
    }

    /// Write the status lines under the maze, cut to the terminal width.
    pub fn draw_status(
        &mut self,
        scene: &Scene<'_>,
        status: &str,
        message: &str,
    ) -> std::io::Result<()> {
        let (_, height) = scene.grid_dims();
        let term_width = terminal::size().map(|(w, _)| w).unwrap_or(u16::MAX) as usize;
        let (status, _) = status.unicode_truncate(term_width);
        let (message, _) = message.unicode_truncate(term_width);
        queue!(
            self.stdout,
            cursor::MoveTo(0, height),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(Color::Green).attribute(Attribute::Bold)),
            cursor::MoveTo(0, height + 1),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(message.with(Color::Cyan)),
        )?;
        self.stdout.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generators::generate_maze, solvers::StepEvent};

    fn scene<'a>(maze: &'a Maze, trace: &'a SearchTrace, view: PathView) -> Scene<'a> {
        Scene {
            maze,
            trace,
            start: Some(Coord::new(0, 0)),
            end: Some(Coord::new(1, 1)),
            cursor: Coord::new(1, 0),
            view,
        }
    }

    #[test]
    fn test_boundary_and_corners_are_walls() {
        let mut maze = Maze::new(2, 2);
        generate_maze(&mut maze, 4);
        let trace = SearchTrace::new(2, 2);
        let scene = scene(&maze, &trace, PathView::Split);
        assert_eq!(scene.grid_dims(), (5, 5));
        for i in 0..5 {
            assert_eq!(scene.glyph_at(i, 0), Glyph::Wall);
            assert_eq!(scene.glyph_at(0, i), Glyph::Wall);
            assert_eq!(scene.glyph_at(i, 4), Glyph::Wall);
            assert_eq!(scene.glyph_at(4, i), Glyph::Wall);
        }
        assert_eq!(scene.glyph_at(2, 2), Glyph::Wall);
    }

    #[test]
    fn test_cells_and_edges() {
        let mut maze = Maze::new(2, 2);
        maze.remove_wall_between(Coord::new(0, 0), Coord::new(0, 1));
        let mut trace = SearchTrace::new(2, 2);
        trace.apply(&StepEvent::exploring(Coord::new(0, 1)));
        let scene = scene(&maze, &trace, PathView::Split);

        assert_eq!(scene.glyph_at(1, 1), Glyph::Start);
        assert_eq!(scene.glyph_at(3, 3), Glyph::End);
        assert_eq!(scene.glyph_at(1, 3), Glyph::Cursor);
        assert_eq!(scene.glyph_at(3, 1), Glyph::Discovered);
        // Open edge between (0,0) and (0,1)
        assert_eq!(scene.glyph_at(2, 1), Glyph::Empty);
        // Closed edge between (0,0) and (1,0)
        assert_eq!(scene.glyph_at(1, 2), Glyph::Wall);
    }

    #[test]
    fn test_route_rendering_depends_on_view() {
        let mut maze = Maze::new(1, 3);
        maze.remove_wall_between(Coord::new(0, 1), Coord::new(0, 2));
        let mut trace = SearchTrace::new(1, 3);
        trace.apply(&StepEvent::exploring(Coord::new(0, 1)));
        trace.apply(&StepEvent::exploring(Coord::new(0, 2)));
        trace.apply(&StepEvent::reconstructing(Coord::new(0, 2)));

        let mut split = scene(&maze, &trace, PathView::Split);
        split.start = None;
        split.end = None;
        split.cursor = Coord::new(0, 0);
        assert_eq!(split.glyph_at(3, 1), Glyph::Discovered);
        assert_eq!(split.glyph_at(5, 1), Glyph::Route);
        assert_eq!(split.glyph_at(4, 1), Glyph::Empty);

        let merged = Scene {
            view: PathView::Merged,
            ..split
        };
        assert_eq!(merged.glyph_at(3, 1), Glyph::Route);
        assert_eq!(merged.glyph_at(4, 1), Glyph::Route);
    }

    #[test]
    fn test_glyph_widths() {
        for glyph in [
            Glyph::Wall,
            Glyph::Empty,
            Glyph::Discovered,
            Glyph::Route,
            Glyph::Start,
            Glyph::End,
            Glyph::Cursor,
        ] {
            // Display asserts the width in debug builds
            assert!(!glyph.to_string().is_empty());
        }
    }

    #[test]
    fn test_path_view_toggle() {
        assert_eq!(PathView::Split.toggled(), PathView::Merged);
        assert_eq!(PathView::Merged.toggled(), PathView::Split);
    }
}
