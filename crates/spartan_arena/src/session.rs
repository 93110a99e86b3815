//! Session controller: one human, many games, one set of daily orders.

use crate::coordinator::{OpponentRequest, Resolution, TurnCoordinator, TurnTicket};
use crate::provider::ProviderError;
use serde::{Deserialize, Serialize};
use spartan_tictactoe::{GamePhase, MoveError, Objective, ObjectiveTracker, Position, Side};
use tracing::{debug, info, instrument};

/// Something that happened in the session, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A mark was placed.
    MoveMade {
        /// Side that moved.
        side: Side,
        /// Claimed cell.
        position: Position,
        /// True when the opponent's answer was replaced by the fallback.
        fallback: bool,
    },
    /// The pacing delay ended and the provider was asked.
    OpponentThinking,
    /// The game reached a terminal phase.
    GameOver {
        /// Final phase.
        phase: GamePhase,
    },
    /// A daily order advanced.
    ObjectiveProgress {
        /// The order after the update.
        objective: Objective,
    },
    /// A new game started.
    Reset,
}

/// Point-in-time view of the session for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Cells in row-major order.
    pub cells: [Option<Side>; 9],
    /// Current phase.
    pub phase: GamePhase,
    /// Side due to move.
    pub to_move: Side,
    /// The human's side.
    pub human_side: Side,
    /// True once the provider has been asked and has not yet answered.
    pub opponent_thinking: bool,
    /// Daily orders and their progress.
    pub objectives: Vec<Objective>,
    /// Games finished this session.
    pub games_completed: u32,
    /// Themed status line.
    pub status: String,
}

impl SessionSnapshot {
    /// The board as a text grid.
    pub fn board_display(&self) -> String {
        let cells = self.cells.map(|c| match c {
            Some(side) => spartan_tictactoe::Cell::Occupied(side),
            None => spartan_tictactoe::Cell::Empty,
        });
        spartan_tictactoe::Board::from_cells(cells).display()
    }
}

/// Themed status line for the arena banner.
pub fn status_message(phase: GamePhase, human_turn: bool, opponent_thinking: bool) -> &'static str {
    match phase {
        GamePhase::Won => "Victory is Yours, Spartan!",
        GamePhase::Lost => "Defeated... Return Stronger!",
        GamePhase::Draw => "A Stalemate in the Arena!",
        GamePhase::Playing if opponent_thinking => "The Enemy Strategizes...",
        GamePhase::Playing if human_turn => "Your Move, Warrior",
        GamePhase::Playing => "Awaiting Enemy Move",
    }
}

/// Owns the coordinator and the daily orders for one session.
#[derive(Debug, Clone)]
pub struct ArenaSession {
    coordinator: TurnCoordinator,
    tracker: ObjectiveTracker,
    games_completed: u32,
}

impl ArenaSession {
    /// Creates a session with the human on `human` and the given orders.
    #[instrument(skip(tracker))]
    pub fn new(human: Side, tracker: ObjectiveTracker) -> Self {
        info!(objectives = tracker.objectives().len(), "Creating arena session");
        Self {
            coordinator: TurnCoordinator::new(human),
            tracker,
            games_completed: 0,
        }
    }

    /// The turn coordinator.
    pub fn coordinator(&self) -> &TurnCoordinator {
        &self.coordinator
    }

    /// The daily orders.
    pub fn tracker(&self) -> &ObjectiveTracker {
        &self.tracker
    }

    /// Handles a human click on `index`.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason; the session is unchanged.
    #[instrument(skip(self))]
    pub fn click(&mut self, index: usize) -> Result<Vec<GameEvent>, MoveError> {
        let human = self.coordinator.game().human();
        let phase = self.coordinator.human_move(index)?;
        let position = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        Ok(self.after_move(human, position, false, phase))
    }

    /// Opens the opponent's turn if due.
    pub fn begin_opponent_turn(&mut self) -> Option<OpponentRequest> {
        self.coordinator.begin_opponent_turn()
    }

    /// Marks the provider as asked for `ticket`. Stale tickets yield nothing.
    pub fn opponent_requested(&mut self, ticket: TurnTicket) -> Option<GameEvent> {
        self.coordinator
            .mark_requested(ticket)
            .then_some(GameEvent::OpponentThinking)
    }

    /// Applies an opponent answer. Stale answers produce no events.
    #[instrument(skip(self, answer))]
    pub fn resolve_opponent(
        &mut self,
        ticket: TurnTicket,
        answer: Result<usize, ProviderError>,
    ) -> (Resolution, Vec<GameEvent>) {
        let opponent = self.coordinator.game().opponent();
        let resolution = self.coordinator.resolve_opponent(ticket, answer);
        let events = match resolution {
            Resolution::Applied {
                position,
                fallback,
                phase,
            } => self.after_move(opponent, position, fallback, phase),
            Resolution::Dropped | Resolution::Stale => Vec::new(),
        };
        (resolution, events)
    }

    /// Starts a new game. Daily orders are kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.coordinator.reset();
        vec![GameEvent::Reset]
    }

    /// Current view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let game = self.coordinator.game();
        let thinking = self.coordinator.is_opponent_requested();
        SessionSnapshot {
            cells: game.board().cells().map(|c| c.side()),
            phase: game.phase(),
            to_move: game.to_move(),
            human_side: game.human(),
            opponent_thinking: thinking,
            objectives: self.tracker.objectives().to_vec(),
            games_completed: self.games_completed,
            status: status_message(game.phase(), game.is_human_turn(), thinking).to_string(),
        }
    }

    fn after_move(
        &mut self,
        side: Side,
        position: Position,
        fallback: bool,
        phase: GamePhase,
    ) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::MoveMade {
            side,
            position,
            fallback,
        }];

        if let Some(outcome) = phase.outcome() {
            self.games_completed += 1;
            info!(%outcome, games = self.games_completed, "Game over");
            events.push(GameEvent::GameOver { phase });

            let human = self.coordinator.game().human();
            for objective in self.tracker.record(outcome, human) {
                debug!(id = objective.id(), "Order progress");
                events.push(GameEvent::ObjectiveProgress { objective });
            }
        }
        events
    }
}
