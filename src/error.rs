use chess::Square;
use thiserror::Error;

/// Why a requested move was not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The move is not legal in the current position
    #[error("illegal move {from}{to}")]
    Illegal { from: Square, to: Square },
    /// No moves are possible because the game has finished
    #[error("the game is over")]
    GameOver,
    /// A square could not be read from text or coordinates
    #[error("invalid square '{notation}'")]
    BadSquare { notation: String },
}

/// A position string that could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Rejected by the rules library
    #[error("invalid FEN '{fen}': {reason}")]
    Position { fen: String, reason: String },
    /// The halfmove or fullmove field is not a number
    #[error("invalid move counter '{field}' in FEN")]
    Counter { field: String },
}
