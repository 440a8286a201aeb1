use thiserror::Error;

use crate::maze::Coord;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Requests the engine refuses. None of these leave the engine in a bad
/// state; the caller can fix the input and try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("both a start and an end cell must be set before solving")]
    InvalidEndpoint,
    #[error("no maze has been generated yet")]
    NoMazeGenerated,
    #[error("cell {coord} is outside the {rows}x{cols} maze")]
    OutOfBounds { coord: Coord, rows: u16, cols: u16 },
    #[error("a solve is already running")]
    SolveInProgress,
}
