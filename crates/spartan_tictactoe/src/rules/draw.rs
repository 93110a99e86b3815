//! Draw detection.

use super::super::{Board, Cell};
use super::win::check_winner;
use tracing::instrument;

/// Checks if every cell is occupied.
#[instrument(level = "trace", skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}

/// A full board with no winner.
#[instrument(level = "trace", skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::super::super::{Position, Side};
    use super::*;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.set(Position::Center, Cell::Occupied(Side::Spartan));
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X X / O X O
        use Side::{Persian as O, Spartan as X};
        let board = Board::from_cells([X, O, X, O, X, X, O, X, O].map(Cell::Occupied));
        assert!(is_full(&board));
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_winner_is_not_draw() {
        use Side::{Persian as O, Spartan as X};
        let board = Board::from_cells([X, X, X, O, O, X, X, O, O].map(Cell::Occupied));
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
