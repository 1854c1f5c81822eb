//! Inbound actions and the per-match action history.
//!
//! Actions arrive already type-disambiguated: the transport parses its
//! frames into this enum and the controller only decides whether each
//! one is legal right now. The engine never sees raw input.

use serde::{Deserialize, Serialize};

use super::player::{PlayerColor, PlayerId};
use crate::board::Coord;
use crate::gods::GodName;

/// Everything a player can ask the engine to do.
///
/// Setup actions (`SelectPlayerCount` through `PlaceWorkers`) are each
/// legal in exactly one phase; `Move` and `Build` make up the two-step
/// turn. The controller rejects any action sent outside its phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Declare the match size. First roster player only, count 2 or 3.
    SelectPlayerCount { count: u8 },
    /// Claim a worker color from the remaining pool.
    SelectColor { color: PlayerColor },
    /// Challenger adds one god card to the match deck.
    AddGod { god: GodName },
    /// Pick one god from the deck during assignment.
    ChooseGod { god: GodName },
    /// Challenger names the starting player by active-roster index.
    SelectStartingPlayer { index: usize },
    /// Put both workers on the board.
    PlaceWorkers { first: Coord, second: Coord },
    /// Move one worker (slot 0 or 1) to a target space.
    Move { worker: u8, to: Coord },
    /// Build with the worker that just moved. `dome` asks for a dome
    /// instead of a block.
    Build { to: Coord, dome: bool },
}

impl Action {
    /// Short action name for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SelectPlayerCount { .. } => "select_player_count",
            Action::SelectColor { .. } => "select_color",
            Action::AddGod { .. } => "add_god",
            Action::ChooseGod { .. } => "choose_god",
            Action::SelectStartingPlayer { .. } => "select_starting_player",
            Action::PlaceWorkers { .. } => "place_workers",
            Action::Move { .. } => "move",
            Action::Build { .. } => "build",
        }
    }
}

/// One accepted action, as recorded in the match history.
///
/// Rejected actions are never recorded; the history replays cleanly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken; 0 during setup.
    pub turn: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self {
            player,
            action,
            turn,
        }
    }
}
