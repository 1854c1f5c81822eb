//! Core types: player identity, colors, actions, errors, RNG.
//!
//! Everything here is match-scoped. No globals: each match owns its own
//! color pool and RNG, so concurrent matches never interfere.

pub mod action;
pub mod error;
pub mod player;
pub mod rng;

pub use action::{Action, ActionRecord};
pub use error::ActionError;
pub use player::{ColorPool, Player, PlayerColor, PlayerId};
pub use rng::MatchRng;
