//! Core domain types for the arena board.

use super::action::MoveError;
use super::position::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A side in the arena.
///
/// Spartans always open a fresh battle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Side {
    /// Spartan side, marks with `X`.
    Spartan,
    /// Persian side, marks with `O`.
    Persian,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Spartan => Side::Persian,
            Side::Persian => Side::Spartan,
        }
    }

    /// Returns the board mark for this side.
    pub fn mark(self) -> char {
        match self {
            Side::Spartan => 'X',
            Side::Persian => 'O',
        }
    }
}

/// A cell on the arena board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell claimed by a side.
    Occupied(Side),
}

impl Cell {
    /// Returns the occupying side, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(side) => Some(side),
        }
    }

    /// Returns the mark as a string, `""` for an empty cell.
    pub fn mark_str(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Occupied(Side::Spartan) => "X",
            Cell::Occupied(Side::Persian) => "O",
        }
    }
}

/// 3x3 arena board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Builds a board from raw cells.
    ///
    /// No legality check is applied; this is how arbitrary positions are
    /// injected for analysis and tests.
    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Gets the cell at a raw index, `None` when out of range.
    pub fn get_index(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Sets the cell at the given position.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.to_index()] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns a copy of this board with `side` placed at `index`.
    ///
    /// # Errors
    ///
    /// Fails without touching `self` when the index is out of range or the
    /// cell is already taken.
    #[instrument(skip(self))]
    pub fn with_move(&self, index: usize, side: Side) -> Result<Board, MoveError> {
        let pos = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        if !self.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }
        let mut next = self.clone();
        next.set(pos, Cell::Occupied(side));
        Ok(next)
    }

    /// Returns the lowest-indexed empty position.
    pub fn first_empty(&self) -> Option<Position> {
        Position::ALL.iter().copied().find(|&pos| self.is_empty(pos))
    }

    /// Number of cells claimed by `side`.
    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Occupied(side))
            .count()
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Marks for every cell, `""` where empty.
    pub fn marks(&self) -> [&'static str; 9] {
        self.cells.map(Cell::mark_str)
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their 1-based number so a player can type it.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.cells[pos] {
                    Cell::Empty => result.push_str(&(pos + 1).to_string()),
                    Cell::Occupied(side) => result.push(side.mark()),
                }
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
