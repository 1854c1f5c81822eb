//! Rejection taxonomy for inbound actions.
//!
//! None of these are fatal. Every rejection leaves the match state
//! byte-for-byte unchanged and is answered to the sender only; the
//! controller maps each family to its wire error kind. Malformed frames
//! never reach this layer (the transport drops them), and internal
//! invariant corruption is a panic, not an `ActionError`.

use thiserror::Error;

use crate::board::Coord;
use crate::controller::MatchPhase;

/// Why an action was rejected.
///
/// Four families:
/// - [`PhaseViolation`](ActionError::PhaseViolation): the action kind does
///   not belong to the current phase.
/// - Out-of-bound: a coordinate, index, or capacity outside its legal range.
/// - [`RuleViolation`](ActionError::RuleViolation): a well-formed action on
///   spaces the rules do not allow (occupied cell, unreachable target).
/// - [`ProtocolViolation`](ActionError::ProtocolViolation): the right kind
///   at the right phase, but out of order (a build before a move, an actor
///   playing out of turn).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Action kind not accepted in the current phase.
    #[error("action not accepted during the {phase} phase")]
    PhaseViolation { phase: MatchPhase },

    /// Coordinate outside the 5x5 grid.
    #[error("coordinate ({row}, {col}) is off the board")]
    CoordOutOfBound { row: u8, col: u8 },

    /// Tower already at full height (or domed).
    #[error("the tower at {coord} cannot grow further")]
    TowerFull { coord: Coord },

    /// Deck already holds one god per player.
    #[error("the deck already holds one god per player")]
    DeckFull,

    /// Starting-player index outside the active roster.
    #[error("no active player at index {index}")]
    PlayerIndexOutOfBound { index: usize },

    /// Declared player count outside 2..=3.
    #[error("a match hosts 2 or 3 players, not {count}")]
    PlayerCountOutOfBound { count: u8 },

    /// Worker slot other than 0 or 1.
    #[error("no worker in slot {slot}")]
    WorkerSlotOutOfBound { slot: u8 },

    /// Legal shape, illegal target(s). Carries the offending coordinates.
    #[error("space not available")]
    RuleViolation { coords: Vec<Coord> },

    /// Right phase, wrong order or wrong actor.
    #[error("{reason}")]
    ProtocolViolation { reason: &'static str },
}

impl ActionError {
    /// Whether this error belongs to the out-of-bound family.
    #[must_use]
    pub fn is_out_of_bound(&self) -> bool {
        matches!(
            self,
            ActionError::CoordOutOfBound { .. }
                | ActionError::TowerFull { .. }
                | ActionError::DeckFull
                | ActionError::PlayerIndexOutOfBound { .. }
                | ActionError::PlayerCountOutOfBound { .. }
                | ActionError::WorkerSlotOutOfBound { .. }
        )
    }

    /// Rule violation over a single offending coordinate.
    #[must_use]
    pub fn illegal_target(coord: Coord) -> Self {
        ActionError::RuleViolation {
            coords: vec![coord],
        }
    }
}
