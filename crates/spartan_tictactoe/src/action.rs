//! Moves as first-class domain events.

use super::{Position, Side};
use serde::{Deserialize, Serialize};

/// A move: a side claiming a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The side making the move.
    pub side: Side,
    /// The claimed position.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(side: Side, position: Position) -> Self {
        Self { side, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.side, self.position.label())
    }
}

/// Reasons a move is rejected.
///
/// A rejected move never changes the board or the phase.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell is already taken.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The index does not name a cell.
    #[display("Index {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// The game has already finished.
    #[display("Game is already over")]
    GameOver,

    /// It is not this side's turn.
    #[display("It's not {}'s turn", _0)]
    WrongSide(Side),
}

impl std::error::Error for MoveError {}
