//! Domain events.
//!
//! Every observer-relevant mutation appends an event to the queue owned
//! by [`Game`](crate::game::Game); there are no silent mutations. The
//! controller drains the queue after each accepted action and turns
//! events into outbound messages; dispatch order is mutation order.

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::core::{PlayerColor, PlayerId};
use crate::gods::GodName;
use crate::workers::MoveRecord;

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Somebody won.
    Victory { winner: PlayerId },
    /// Somebody left mid-match.
    Desertion { player: PlayerId },
}

/// Something observers need to hear about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player claimed (or was handed) a color.
    ColorAssigned {
        player: PlayerId,
        color: PlayerColor,
        /// Last color auto-assigned to the last chooser.
        auto: bool,
    },
    /// The challenger added a god to the deck.
    GodAdded { god: GodName },
    /// A player received a god from the deck.
    GodAssigned { player: PlayerId, god: GodName },
    /// The challenger named the starting player.
    StartingPlayerChosen { player: PlayerId },
    /// A player put both workers on the board.
    WorkersPlaced {
        player: PlayerId,
        color: PlayerColor,
        first: Coord,
        second: Coord,
    },
    /// An ordinary single-worker move.
    WorkerMoved { mv: MoveRecord },
    /// A compound move: Apollo swap or Minotaur push.
    DoubleMove {
        acting: MoveRecord,
        displaced: MoveRecord,
        god: GodName,
    },
    /// A block or dome was built.
    BlockBuilt {
        coord: Coord,
        /// Tower level after the build.
        level: u8,
        dome: bool,
    },
    /// A new turn began for `player`.
    TurnStarted { player: PlayerId },
    /// `player` satisfied their win condition.
    WinAchieved { player: PlayerId },
    /// A player left (lobby or mid-match).
    PlayerRemoved { player: PlayerId },
    /// The match is over.
    MatchEnded { reason: EndReason },
}
