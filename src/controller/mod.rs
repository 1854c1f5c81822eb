//! Match orchestration: phases, action dispatch, and outbound messages.
//!
//! ## Key Types
//!
//! - `MatchController`: The phase machine driving one match
//! - `MatchPhase` / `TurnStep`: Where the match and the current turn stand
//! - `Envelope` / `DeliveryScope`: A message plus who receives it
//! - `OutboundMessage`: Everything the engine can say to a player
//! - `GameError`: Wire error kinds, mapped from the rejection taxonomy
//!
//! ## Flow
//!
//! The transport feeds `MatchController::handle` one `(player, action)`
//! pair at a time and fans out the returned envelopes. The controller
//! never does I/O itself.

pub mod controller;
pub mod messages;
pub mod phase;

pub use controller::MatchController;
pub use messages::{DeliveryScope, Envelope, GameError, OutboundMessage};
pub use phase::{MatchPhase, TurnStep};
