//! Spartan Arena session layer.
//!
//! Turn coordination between a human and a move provider, the async
//! runtime that paces and cancels opponent requests, daily orders across
//! games, and the terminal and HTTP front ends over one session.

#![warn(missing_docs)]

pub mod config;
pub mod coordinator;
mod llm_client;
pub mod play;
pub mod provider;
pub mod runtime;
pub mod server;
pub mod session;

pub use config::{ArenaConfig, ConfigError, OpponentConfig, OpponentKind};
pub use coordinator::{OpponentRequest, Resolution, TurnCoordinator, TurnTicket};
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};
pub use provider::{
    FirstEmptyProvider, LlmMoveProvider, MinimaxProvider, MoveProvider, MoveRequest,
    ProviderError,
};
pub use runtime::{ClickOutcome, RuntimeSettings, SessionClosed, SessionHandle};
pub use server::router;
pub use session::{ArenaSession, GameEvent, SessionSnapshot, status_message};
