//! Pure game logic for Spartan Arena.
//!
//! - [`Board`], [`Cell`], [`Position`]: the 3x3 grid
//! - [`rules`]: win and draw detection
//! - [`Game`]: turn alternation and the phase state machine
//! - [`ObjectiveTracker`]: daily orders credited by finished games
//!
//! Nothing here performs I/O or awaits; the session layer drives it.

#![warn(missing_docs)]

mod action;
mod game;
pub mod invariants;
mod objectives;
mod phases;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use game::Game;
pub use objectives::{Objective, ObjectiveTracker, daily_orders};
pub use phases::{GamePhase, Outcome};
pub use position::Position;
pub use rules::{check_winner, is_draw, is_full};
pub use types::{Board, Cell, Side};
