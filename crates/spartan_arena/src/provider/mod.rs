//! Opponent move providers.
//!
//! A provider is an untrusted oracle: it is handed the board and both marks
//! and answers with a cell index, or fails. The coordinator validates every
//! answer before it touches the game.

mod first_empty;
mod llm;
mod minimax;

pub use first_empty::FirstEmptyProvider;
pub use llm::{LlmMoveProvider, SYSTEM_PROMPT, move_prompt, parse_move_index};
pub use minimax::MinimaxProvider;

use derive_getters::Getters;
use derive_more::{Display, Error};
use spartan_tictactoe::{Board, Side};
use tracing::instrument;

/// Everything a provider gets to see for one opponent turn.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct MoveRequest {
    /// Board before the opponent moves.
    board: Board,
    /// The side the provider plays.
    own_mark: Side,
    /// The human's side.
    human_mark: Side,
}

/// Capability that picks the opponent's cell.
#[async_trait::async_trait]
pub trait MoveProvider: Send + Sync {
    /// Returns the chosen index (0-8) for `request.own_mark()`.
    ///
    /// The index is not trusted: it may be out of range or occupied.
    async fn request_move(&self, request: &MoveRequest) -> Result<usize, ProviderError>;

    /// Short name for logs and status output.
    fn name(&self) -> &str;
}

/// Move provider failure: network, parse, or no move to offer.
#[derive(Debug, Clone, Display, Error)]
#[display("Provider error: {} at {}:{}", message, file, line)]
pub struct ProviderError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProviderError {
    /// Creates a new provider error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<crate::LlmError> for ProviderError {
    /// Keeps the location recorded by the LLM client.
    fn from(err: crate::LlmError) -> Self {
        Self {
            message: err.message,
            line: err.line,
            file: err.file,
        }
    }
}
