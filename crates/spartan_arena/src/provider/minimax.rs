//! Offline opponent that never loses.

use super::{MoveProvider, MoveRequest, ProviderError};
use spartan_tictactoe::{Board, Cell, Position, Side, check_winner, is_full};
use tracing::{debug, instrument};

/// Alpha-beta minimax over the full game tree.
///
/// Quicker wins and slower losses score better, so among equal results the
/// shortest path is taken. Ties go to the lowest index.
#[derive(Debug, Clone, Default)]
pub struct MinimaxProvider;

impl MinimaxProvider {
    /// Best cell for `side` on `board`, `None` when the board is full.
    #[instrument(skip(board))]
    pub fn best_move(board: &Board, side: Side) -> Option<Position> {
        let mut scratch = board.clone();
        let mut best: Option<(Position, i32)> = None;

        for pos in Position::valid_moves(board) {
            scratch.set(pos, Cell::Occupied(side));
            let score = -negamax(&mut scratch, side.opponent(), 1, -i32::MAX, i32::MAX);
            scratch.set(pos, Cell::Empty);

            if best.is_none_or(|(_, s)| score > s) {
                best = Some((pos, score));
            }
        }

        best.map(|(pos, _)| pos)
    }
}

/// Score from the point of view of `to_move`.
fn negamax(board: &mut Board, to_move: Side, depth: i32, mut alpha: i32, beta: i32) -> i32 {
    if let Some(winner) = check_winner(board) {
        let score = 10 - depth;
        return if winner == to_move { score } else { -score };
    }
    if is_full(board) {
        return 0;
    }

    let mut best = -i32::MAX;
    for pos in Position::ALL {
        if !board.is_empty(pos) {
            continue;
        }
        board.set(pos, Cell::Occupied(to_move));
        let score = -negamax(board, to_move.opponent(), depth + 1, -beta, -alpha);
        board.set(pos, Cell::Empty);

        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

#[async_trait::async_trait]
impl MoveProvider for MinimaxProvider {
    async fn request_move(&self, request: &MoveRequest) -> Result<usize, ProviderError> {
        let pos = Self::best_move(request.board(), *request.own_mark())
            .ok_or_else(|| ProviderError::new("No empty cell left"))?;
        debug!(position = %pos, "Minimax choice");
        Ok(pos.to_index())
    }

    fn name(&self) -> &str {
        "minimax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(moves: &[(usize, Side)]) -> Board {
        moves
            .iter()
            .fold(Board::new(), |b, &(i, s)| b.with_move(i, s).unwrap())
    }

    #[test]
    fn test_takes_the_win() {
        let b = board(&[(0, Side::Persian), (1, Side::Persian), (3, Side::Spartan), (4, Side::Spartan)]);
        assert_eq!(MinimaxProvider::best_move(&b, Side::Persian), Some(Position::TopRight));
    }

    #[test]
    fn test_blocks_the_threat() {
        let b = board(&[(0, Side::Spartan), (1, Side::Spartan), (4, Side::Persian)]);
        assert_eq!(MinimaxProvider::best_move(&b, Side::Persian), Some(Position::TopRight));
    }

    #[test]
    fn test_answers_corner_opening_with_center() {
        let b = board(&[(0, Side::Spartan)]);
        assert_eq!(MinimaxProvider::best_move(&b, Side::Persian), Some(Position::Center));
    }

    #[test]
    fn test_full_board_has_no_move() {
        use Side::{Persian as O, Spartan as X};
        let b = Board::from_cells([X, O, X, O, X, X, O, X, O].map(Cell::Occupied));
        assert_eq!(MinimaxProvider::best_move(&b, Side::Persian), None);
    }
}
