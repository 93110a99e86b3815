//! Offline opponent that takes the first free cell.

use super::{MoveProvider, MoveRequest, ProviderError};
use tracing::debug;

/// Picks the lowest-indexed empty cell.
#[derive(Debug, Clone, Default)]
pub struct FirstEmptyProvider;

#[async_trait::async_trait]
impl MoveProvider for FirstEmptyProvider {
    async fn request_move(&self, request: &MoveRequest) -> Result<usize, ProviderError> {
        let pos = request
            .board()
            .first_empty()
            .ok_or_else(|| ProviderError::new("No empty cell left"))?;
        debug!(position = %pos, "First empty cell");
        Ok(pos.to_index())
    }

    fn name(&self) -> &str {
        "first-empty"
    }
}
