//! Board error taxonomy
//!
//! None of these are expected to reach a player. Running out of moves is a
//! normal outcome and lives in `GamePhase::GameOver` instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Direction could not be parsed from external input
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    /// Spawn requested on a full board (check `cells_available` first)
    #[error("no empty cell to spawn a tile into")]
    NoEmptyCell,

    /// Spawn requested while tiles are still sliding or popping in
    #[error("board is still animating")]
    Unsettled,

    /// Cell lookup outside the grid
    #[error("cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// Grid of values that cannot be turned into a board
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
