//! Rule properties checked over every possible board.

use spartan_tictactoe::{Board, Cell, Game, GamePhase, MoveError, Side, check_winner, is_draw, rules::LINES};

/// All 3^9 cell assignments, legal or not.
fn all_boards() -> impl Iterator<Item = Board> {
    (0..3u32.pow(9)).map(|mut code| {
        let mut cells = [Cell::Empty; 9];
        for cell in cells.iter_mut() {
            *cell = match code % 3 {
                0 => Cell::Empty,
                1 => Cell::Occupied(Side::Spartan),
                _ => Cell::Occupied(Side::Persian),
            };
            code /= 3;
        }
        Board::from_cells(cells)
    })
}

fn has_uniform_line(board: &Board) -> bool {
    LINES.iter().any(|&[a, b, c]| {
        let cell = board.get(a);
        cell != Cell::Empty && cell == board.get(b) && cell == board.get(c)
    })
}

#[test]
fn test_winner_iff_uniform_line() {
    for board in all_boards() {
        assert_eq!(
            check_winner(&board).is_some(),
            has_uniform_line(&board),
            "board:\n{}",
            board.display()
        );
    }
}

#[test]
fn test_winner_is_first_uniform_line() {
    for board in all_boards() {
        let first = LINES.iter().find_map(|&[a, b, c]| {
            let cell = board.get(a);
            (cell != Cell::Empty && cell == board.get(b) && cell == board.get(c))
                .then(|| cell.side())
                .flatten()
        });
        assert_eq!(check_winner(&board), first);
    }
}

#[test]
fn test_draw_iff_full_without_winner() {
    for board in all_boards().filter(|b| check_winner(b).is_none()) {
        let full = board.cells().iter().all(|c| *c != Cell::Empty);
        assert_eq!(is_draw(&board), full);
    }
}

#[test]
fn test_invalid_moves_are_no_ops() {
    let mut game = Game::new(Side::Spartan);
    game.place(0, Side::Spartan).unwrap();
    let snapshot = game.clone();

    let attempts = [
        (0, Side::Persian),
        (9, Side::Persian),
        (1, Side::Spartan),
    ];
    for (index, side) in attempts {
        assert!(game.place(index, side).is_err());
        assert_eq!(game, snapshot);
    }
}

#[test]
fn test_center_click_on_empty_board() {
    let mut game = Game::new(Side::Spartan);
    game.place(4, Side::Spartan).unwrap();
    assert_eq!(game.board().marks()[4], "X");
    assert_eq!(game.to_move(), Side::Persian);
    assert_eq!(game.phase(), GamePhase::Playing);
}

#[test]
fn test_completing_top_row_wins() {
    // [A, A, _, B, B, _, _, _, _] with A to move.
    let mut game = Game::new(Side::Spartan);
    for (index, side) in [
        (0, Side::Spartan),
        (3, Side::Persian),
        (1, Side::Spartan),
        (4, Side::Persian),
    ] {
        game.place(index, side).unwrap();
    }
    assert_eq!(game.place(2, Side::Spartan), Ok(GamePhase::Won));
    assert_eq!(game.winner(), Some(Side::Spartan));
    assert_eq!(game.place(5, Side::Persian), Err(MoveError::GameOver));
}

#[test]
fn test_full_board_without_line_is_draw() {
    // X O X / X O O / O X X
    let mut game = Game::new(Side::Spartan);
    for (index, side) in [
        (0, Side::Spartan),
        (1, Side::Persian),
        (2, Side::Spartan),
        (4, Side::Persian),
        (3, Side::Spartan),
        (5, Side::Persian),
        (7, Side::Spartan),
        (6, Side::Persian),
        (8, Side::Spartan),
    ] {
        game.place(index, side).unwrap();
    }
    assert_eq!(game.phase(), GamePhase::Draw);
    assert!(is_draw(game.board()));
}
