//! Opponent backed by a hosted language model.

use super::{MoveProvider, MoveRequest, ProviderError};
use crate::LlmClient;
use tracing::{debug, instrument, warn};

/// System prompt sent with every move request.
pub const SYSTEM_PROMPT: &str = "You are an expert tic-tac-toe opponent. \
Answer with a single number from 0 to 8 and nothing else.";

/// Builds the user prompt for one turn.
///
/// The board is sent as a JSON array of marks with `""` for empty cells.
pub fn move_prompt(request: &MoveRequest) -> String {
    let board = serde_json::to_string(&request.board().marks()).unwrap_or_default();
    let own = request.own_mark().mark();
    let human = request.human_mark().mark();
    format!(
        "The human plays '{human}'. You play '{own}'.\n\
         The board is a 9-element array indexed 0-8, left to right, top to bottom.\n\
         Current board: {board}\n\
         An empty string \"\" marks an empty cell.\n\n\
         Pick the single best cell for '{own}'. Win if you can. Otherwise block \
         '{human}' from winning. Otherwise play strategically, taking the center \
         or a corner.\n\n\
         Reply with only the index of your cell, a number from 0 to 8."
    )
}

/// Reads the leading non-negative integer of a model reply.
///
/// Range and occupancy are left to the caller.
#[instrument]
pub fn parse_move_index(reply: &str) -> Result<usize, ProviderError> {
    let digits: String = reply
        .trim()
        .trim_start_matches(['`', '"', '\''])
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    digits
        .parse::<usize>()
        .map_err(|_| ProviderError::new(format!("Non-numeric move reply: {reply:?}")))
}

/// Move provider asking an LLM for each move.
#[derive(Debug, Clone)]
pub struct LlmMoveProvider {
    client: LlmClient,
    name: String,
}

impl LlmMoveProvider {
    /// Wraps a configured client.
    pub fn new(client: LlmClient) -> Self {
        let name = format!("llm:{}", client.config().model());
        Self { client, name }
    }
}

#[async_trait::async_trait]
impl MoveProvider for LlmMoveProvider {
    #[instrument(skip(self, request), fields(provider = %self.name))]
    async fn request_move(&self, request: &MoveRequest) -> Result<usize, ProviderError> {
        let prompt = move_prompt(request);
        debug!(prompt_length = prompt.len(), "Requesting move");

        let reply = self.client.generate(SYSTEM_PROMPT, &prompt).await?;
        let index = parse_move_index(&reply).inspect_err(|e| {
            warn!(reply = %reply, error = %e, "Model returned no usable index");
        })?;

        debug!(index, "Model chose cell");
        Ok(index)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
