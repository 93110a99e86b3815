//! Invariants checked after every accepted move.
//!
//! Invariants are logical properties that must hold throughout a game. They
//! are checked in debug builds and can be tested independently.

use super::{Game, Side};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Spartans open, so Spartan marks equal Persian marks or lead by one.
pub struct SpartanFirstInvariant;

impl Invariant<Game> for SpartanFirstInvariant {
    fn holds(game: &Game) -> bool {
        let spartans = game.board().count(Side::Spartan);
        let persians = game.board().count(Side::Persian);
        spartans == persians || spartans == persians + 1
    }

    fn description() -> &'static str {
        "Spartan marks equal Persian marks or lead by one"
    }
}

/// Every occupied cell has exactly one move in the history.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        game.history().len() == game.board().occupied()
            && game
                .history()
                .iter()
                .all(|m| game.board().get(m.position).side() == Some(m.side))
    }

    fn description() -> &'static str {
        "History matches the occupied cells"
    }
}

/// All game invariants as a composable set.
pub type GameInvariants = (SpartanFirstInvariant, HistoryConsistentInvariant);
