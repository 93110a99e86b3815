//! Game phases and outcomes, seen from the human's side of the board.

use super::Side;
use serde::{Deserialize, Serialize};

/// Where a game stands.
///
/// `Playing` is the only non-terminal phase; the others are left only by a
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Moves are being accepted.
    Playing,
    /// The human's side completed a line.
    Won,
    /// The opponent's side completed a line.
    Lost,
    /// Board full with no line.
    Draw,
}

impl GamePhase {
    /// Returns true for every phase except `Playing`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }

    /// The outcome a terminal phase represents.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            GamePhase::Playing => None,
            GamePhase::Won => Some(Outcome::Win),
            GamePhase::Lost => Some(Outcome::Loss),
            GamePhase::Draw => Some(Outcome::Draw),
        }
    }

    /// Phase reached when `winner` (if any) ends the game for `human`.
    pub fn from_result(winner: Option<Side>, human: Side) -> Self {
        match winner {
            Some(side) if side == human => GamePhase::Won,
            Some(_) => GamePhase::Lost,
            None => GamePhase::Draw,
        }
    }
}

/// Terminal result of a game, as credited to daily orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    /// The human won.
    Win,
    /// The human lost.
    Loss,
    /// Nobody completed a line.
    Draw,
}
