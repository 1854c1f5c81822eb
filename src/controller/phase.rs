//! Match phases and the turn sub-state.

use serde::{Deserialize, Serialize};

use crate::workers::WorkerId;

/// Where the match is in its life cycle.
///
/// The phase is the single source of truth for which action kinds are
/// accepted; anything else is rejected without touching state. Phases
/// only ever advance, in declaration order, except that any phase can
/// jump straight to `Ended`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Roster building; accepts the player-count declaration.
    Lobby,
    /// Players claim colors one at a time.
    ColorSelection,
    /// The challenger fills the deck, one god per player.
    ChallengerSelection,
    /// Players pick their god from the deck.
    GodAssignment,
    /// The challenger names who goes first.
    StartingPlayerSelection,
    /// Players put their workers on the board, in turn order.
    WorkerPlacement,
    /// The move/build turn loop.
    TurnPlay,
    /// Terminal. Every action is rejected.
    Ended,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchPhase::Lobby => "lobby",
            MatchPhase::ColorSelection => "color selection",
            MatchPhase::ChallengerSelection => "challenger selection",
            MatchPhase::GodAssignment => "god assignment",
            MatchPhase::StartingPlayerSelection => "starting player selection",
            MatchPhase::WorkerPlacement => "worker placement",
            MatchPhase::TurnPlay => "turn play",
            MatchPhase::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Position inside one TurnPlay turn.
///
/// The build is pinned to the worker that moved; there is no way to
/// move one worker and build with the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStep {
    /// Waiting for the move.
    Move,
    /// Move made; waiting for the build from that worker.
    Build { worker: WorkerId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(MatchPhase::Lobby.to_string(), "lobby");
        assert_eq!(MatchPhase::GodAssignment.to_string(), "god assignment");
        assert_eq!(
            MatchPhase::StartingPlayerSelection.to_string(),
            "starting player selection"
        );
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&MatchPhase::TurnPlay).unwrap();
        let back: MatchPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MatchPhase::TurnPlay);
    }
}
