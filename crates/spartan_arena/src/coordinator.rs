//! Turn coordination between the human and the move provider.
//!
//! The coordinator is synchronous. It hands out at most one opponent request
//! per turn, tagged with a [`TurnTicket`], and only accepts an answer carrying
//! the ticket it is waiting on. Reset invalidates every outstanding ticket.

use crate::provider::{MoveRequest, ProviderError};
use derive_getters::Getters;
use spartan_tictactoe::{Cell, Game, GamePhase, MoveError, Position, Side};
use tracing::{debug, info, instrument, warn};

/// Identifies one opponent turn of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnTicket {
    generation: u64,
    ply: usize,
}

/// An opponent turn waiting on the provider.
#[derive(Debug, Clone, Getters)]
pub struct OpponentRequest {
    /// Ticket to hand back with the answer.
    ticket: TurnTicket,
    /// What the provider is shown.
    request: MoveRequest,
}

/// What became of a provider answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A move was placed for the opponent.
    Applied {
        /// Cell that was claimed.
        position: Position,
        /// True when the provider's answer was unusable.
        fallback: bool,
        /// Phase after the move.
        phase: GamePhase,
    },
    /// No empty cell was left; the turn had no effect.
    Dropped,
    /// The ticket was superseded; nothing was touched.
    Stale,
}

/// Owns the game and whose turn it is.
#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    game: Game,
    generation: u64,
    awaiting: Option<TurnTicket>,
    requested: bool,
}

impl TurnCoordinator {
    /// Starts a fresh game with the human on `human`.
    pub fn new(human: Side) -> Self {
        Self {
            game: Game::new(human),
            generation: 0,
            awaiting: None,
            requested: false,
        }
    }

    /// The current game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// True while an opponent turn is open, pacing delay included.
    pub fn is_awaiting_opponent(&self) -> bool {
        self.awaiting.is_some()
    }

    /// True once the provider has actually been asked for the open turn.
    pub fn is_opponent_requested(&self) -> bool {
        self.awaiting.is_some() && self.requested
    }

    /// Records that the provider was asked for `ticket`.
    ///
    /// Returns false for a superseded ticket.
    pub fn mark_requested(&mut self, ticket: TurnTicket) -> bool {
        if self.awaiting != Some(ticket) {
            return false;
        }
        self.requested = true;
        true
    }

    /// Applies a human click.
    ///
    /// # Errors
    ///
    /// Rejected without any state change when the game is over, the opponent
    /// is to move, or the cell is taken or out of range.
    #[instrument(skip(self))]
    pub fn human_move(&mut self, index: usize) -> Result<GamePhase, MoveError> {
        if self.game.phase().is_terminal() {
            return Err(MoveError::GameOver);
        }
        if !self.game.is_human_turn() {
            return Err(MoveError::WrongSide(self.game.human()));
        }
        self.game.place(index, self.game.human())
    }

    /// Opens the opponent's turn if it is due and not already open.
    #[instrument(skip(self))]
    pub fn begin_opponent_turn(&mut self) -> Option<OpponentRequest> {
        if !self.game.is_opponent_turn() || self.awaiting.is_some() {
            return None;
        }

        let ticket = TurnTicket {
            generation: self.generation,
            ply: self.game.history().len(),
        };
        self.awaiting = Some(ticket);
        debug!(?ticket, "Opponent turn opened");

        Some(OpponentRequest {
            ticket,
            request: MoveRequest::new(
                self.game.board().clone(),
                self.game.opponent(),
                self.game.human(),
            ),
        })
    }

    /// Applies the provider's answer for `ticket`.
    ///
    /// A usable answer is an index naming an empty cell. Anything else, or a
    /// provider failure, falls back to the lowest-indexed empty cell.
    #[instrument(skip(self, answer))]
    pub fn resolve_opponent(
        &mut self,
        ticket: TurnTicket,
        answer: Result<usize, ProviderError>,
    ) -> Resolution {
        if self.awaiting != Some(ticket) {
            debug!(?ticket, awaiting = ?self.awaiting, "Discarding stale answer");
            return Resolution::Stale;
        }
        self.awaiting = None;
        self.requested = false;

        let chosen = match answer {
            Ok(index) if self.game.board().get_index(index) == Some(Cell::Empty) => {
                Position::from_index(index)
            }
            Ok(index) => {
                warn!(index, "Provider chose an unusable cell, falling back");
                None
            }
            Err(e) => {
                warn!(error = %e, "Provider failed, falling back");
                None
            }
        };
        let fallback = chosen.is_none();

        let Some(position) = chosen.or_else(|| self.game.first_empty()) else {
            warn!("No empty cell for fallback, dropping turn");
            return Resolution::Dropped;
        };

        match self.game.place(position.to_index(), self.game.opponent()) {
            Ok(phase) => {
                info!(%position, fallback, ?phase, "Opponent moved");
                Resolution::Applied {
                    position,
                    fallback,
                    phase,
                }
            }
            Err(e) => {
                warn!(error = %e, "Opponent move rejected, dropping turn");
                Resolution::Dropped
            }
        }
    }

    /// Starts a new game and invalidates any outstanding ticket.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.game.reset();
        self.generation += 1;
        self.awaiting = None;
        self.requested = false;
    }
}
