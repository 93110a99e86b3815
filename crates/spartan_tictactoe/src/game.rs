//! Game engine: one board, one human side, one phase.

use super::action::{Move, MoveError};
use super::invariants::{GameInvariants, InvariantSet};
use super::phases::GamePhase;
use super::rules::{check_winner, is_full};
use super::{Board, Position, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A single arena game.
///
/// The phase is always reported from the human's side: a Persian line is a
/// loss when the human plays Spartan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    to_move: Side,
    human: Side,
    phase: GamePhase,
    history: Vec<Move>,
}

impl Game {
    /// Creates a fresh game with the human playing `human`.
    #[instrument]
    pub fn new(human: Side) -> Self {
        Self {
            board: Board::new(),
            to_move: Side::Spartan,
            human,
            phase: GamePhase::Playing,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move next.
    ///
    /// After a terminal move this stays on the side that ended the game.
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// The human's side.
    pub fn human(&self) -> Side {
        self.human
    }

    /// The opponent's side.
    pub fn opponent(&self) -> Side {
        self.human.opponent()
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Accepted moves in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The winning side, if a line is complete.
    pub fn winner(&self) -> Option<Side> {
        check_winner(&self.board)
    }

    /// True when the human is due to move in a live game.
    pub fn is_human_turn(&self) -> bool {
        self.phase == GamePhase::Playing && self.to_move == self.human
    }

    /// True when the opponent is due to move in a live game.
    pub fn is_opponent_turn(&self) -> bool {
        self.phase == GamePhase::Playing && self.to_move != self.human
    }

    /// Lowest-indexed empty cell.
    pub fn first_empty(&self) -> Option<Position> {
        self.board.first_empty()
    }

    /// Places `side` at `index` and returns the phase after the move.
    ///
    /// # Errors
    ///
    /// Rejects the move, leaving the game unchanged, when the game is over,
    /// `side` is not to move, the index is out of range, or the cell is taken.
    #[instrument(skip(self), fields(to_move = %self.to_move, phase = ?self.phase))]
    pub fn place(&mut self, index: usize, side: Side) -> Result<GamePhase, MoveError> {
        if self.phase.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if side != self.to_move {
            return Err(MoveError::WrongSide(side));
        }

        let board = self.board.with_move(index, side)?;
        let position = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        self.board = board;
        self.history.push(Move::new(side, position));
        debug!(%position, %side, "Move applied");

        if let Some(winner) = check_winner(&self.board) {
            self.phase = GamePhase::from_result(Some(winner), self.human);
            info!(%winner, phase = ?self.phase, "Line completed");
        } else if is_full(&self.board) {
            self.phase = GamePhase::Draw;
            info!("Board full, draw");
        } else {
            self.to_move = side.opponent();
        }

        debug_assert!(
            GameInvariants::check_all(self).is_ok(),
            "game invariants violated after {position}"
        );

        Ok(self.phase)
    }

    /// Clears the board and history for a new game. The human's side is kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new(self.human);
        info!("Game reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    #[test]
    fn test_center_opening_flips_turn() {
        let mut game = Game::new(Side::Spartan);
        assert_eq!(game.place(4, Side::Spartan), Ok(GamePhase::Playing));
        assert_eq!(game.board().get(Position::Center), Cell::Occupied(Side::Spartan));
        assert_eq!(game.to_move(), Side::Persian);
        assert!(game.is_opponent_turn());
    }

    #[test]
    fn test_rejections_leave_game_unchanged() {
        let mut game = Game::new(Side::Spartan);
        game.place(4, Side::Spartan).unwrap();
        let before = game.clone();

        assert_eq!(
            game.place(4, Side::Persian),
            Err(MoveError::SquareOccupied(Position::Center))
        );
        assert_eq!(game.place(0, Side::Spartan), Err(MoveError::WrongSide(Side::Spartan)));
        assert_eq!(game.place(11, Side::Persian), Err(MoveError::OutOfBounds(11)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_terminal_game_rejects_moves() {
        let mut game = Game::new(Side::Spartan);
        for (index, side) in [
            (0, Side::Spartan),
            (3, Side::Persian),
            (1, Side::Spartan),
            (4, Side::Persian),
            (2, Side::Spartan),
        ] {
            game.place(index, side).unwrap();
        }
        assert_eq!(game.phase(), GamePhase::Won);
        let before = game.clone();
        assert_eq!(game.place(8, Side::Spartan), Err(MoveError::GameOver));
        assert_eq!(game.place(8, Side::Persian), Err(MoveError::GameOver));
        assert_eq!(game, before);
    }

    #[test]
    fn test_opponent_line_is_a_loss() {
        let mut game = Game::new(Side::Persian);
        for (index, side) in [
            (0, Side::Spartan),
            (3, Side::Persian),
            (1, Side::Spartan),
            (4, Side::Persian),
            (2, Side::Spartan),
        ] {
            game.place(index, side).unwrap();
        }
        assert_eq!(game.phase(), GamePhase::Lost);
        assert_eq!(game.winner(), Some(Side::Spartan));
    }

    #[test]
    fn test_reset_restores_spartan_opening() {
        let mut game = Game::new(Side::Persian);
        game.place(4, Side::Spartan).unwrap();
        game.reset();
        assert_eq!(game, Game::new(Side::Persian));
        assert!(game.is_opponent_turn());
    }
}
