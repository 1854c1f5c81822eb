//! The match aggregate and its event queue.

pub mod events;
pub mod state;

pub use events::{EndReason, GameEvent};
pub use state::{Game, MAX_PLAYERS};
