//! Outbound messages, delivery scopes, and the event routing table.
//!
//! The engine never sends anything. It returns [`Envelope`]s, a message
//! plus a delivery scope, and the transport fans them out. All framing
//! is the transport's problem; everything here is plain serializable
//! data.
//!
//! [`route`] is the one place events become messages. One `match`, one
//! row per event kind, so the complete notification behavior of the
//! engine can be audited in a single screen.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::board::Coord;
use crate::core::{ActionError, PlayerColor, PlayerId};
use crate::game::{EndReason, Game, GameEvent};
use crate::gods::GodName;
use crate::workers::MoveRecord;

/// Who a message goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryScope {
    /// Exactly one player.
    Single(PlayerId),
    /// Everyone but one player.
    AllExcept(PlayerId),
    /// Every player in the match.
    All,
}

/// A message with its delivery scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub scope: DeliveryScope,
    pub message: OutboundMessage,
}

impl Envelope {
    #[must_use]
    pub fn single(player: PlayerId, message: OutboundMessage) -> Self {
        Self {
            scope: DeliveryScope::Single(player),
            message,
        }
    }

    #[must_use]
    pub fn all_except(player: PlayerId, message: OutboundMessage) -> Self {
        Self {
            scope: DeliveryScope::AllExcept(player),
            message,
        }
    }

    #[must_use]
    pub fn all(message: OutboundMessage) -> Self {
        Self {
            scope: DeliveryScope::All,
            message,
        }
    }
}

/// Wire error kinds, as shown to players.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    /// The requested cell(s) cannot be used.
    #[error("cell occupied")]
    CellOccupied { coords: Vec<Coord> },
    /// Malformed or out-of-order request.
    #[error("invalid input")]
    InvalidInput { message: Option<String> },
    /// A coordinate, index, or capacity outside its range.
    #[error("out of range")]
    OutOfRange,
}

impl From<&ActionError> for GameError {
    /// The taxonomy-to-wire mapping: rule violations show the occupied
    /// cells, the out-of-bound family collapses to `OutOfRange`, phase
    /// and protocol violations explain themselves as `InvalidInput`.
    fn from(err: &ActionError) -> Self {
        match err {
            ActionError::RuleViolation { coords } => GameError::CellOccupied {
                coords: coords.clone(),
            },
            ActionError::PhaseViolation { .. } | ActionError::ProtocolViolation { .. } => {
                GameError::InvalidInput {
                    message: Some(err.to_string()),
                }
            }
            _ => GameError::OutOfRange,
        }
    }
}

/// Everything the engine can say to a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// Ask the addressee to pick a color.
    ColorRequest { remaining: Vec<PlayerColor> },
    /// Ask the challenger to act: build the deck, or (later) name the
    /// starting player.
    ChallengerPrompt {
        text: String,
        /// Gods still available to add, during deck building.
        gods: Option<Vec<GodName>>,
        /// Active nicknames, during starting-player selection.
        players: Option<Vec<String>>,
    },
    /// Ask the addressee to pick their god from the deck.
    GodAssignmentPrompt { text: String, gods: Vec<GodName> },
    /// Ask the addressee to place both workers.
    WorkerPlacementPrompt { text: String, empty: Vec<Coord> },
    /// Setup is complete. One entry per active player in both maps.
    MatchStarted {
        colors: FxHashMap<String, PlayerColor>,
        gods: FxHashMap<String, GodName>,
    },
    /// A new turn began.
    TurnStarted { nickname: String },
    /// Free-form notice.
    Info { text: String },
    /// The addressee's last action was rejected.
    Error { error: GameError },
    /// Somebody won.
    WinAnnounced { nickname: String },
    /// The match is over.
    MatchEnded { reason: String },
    /// Board update: two workers appeared.
    WorkersPlaced {
        nickname: String,
        color: PlayerColor,
        positions: [Coord; 2],
    },
    /// Board update: a worker moved.
    WorkerMoved { mv: MoveRecord },
    /// Board update: a compound move (swap or push).
    DoubleMove {
        acting: MoveRecord,
        displaced: MoveRecord,
        god: GodName,
    },
    /// Board update: a block or dome appeared.
    BlockBuilt { coord: Coord, level: u8, dome: bool },
}

impl OutboundMessage {
    /// Plain info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        OutboundMessage::Info { text: text.into() }
    }

    /// Error reply for a rejected action.
    #[must_use]
    pub fn rejection(err: &ActionError) -> Self {
        OutboundMessage::Error { error: err.into() }
    }
}

fn nickname(game: &Game, player: PlayerId) -> String {
    match game.player(player) {
        Some(p) => p.nickname().to_string(),
        None => player.to_string(),
    }
}

/// Turn one event into its envelopes. The complete routing table.
pub(crate) fn route(event: &GameEvent, game: &Game) -> SmallVec<[Envelope; 2]> {
    let mut out = SmallVec::new();
    match event {
        GameEvent::ColorAssigned {
            player,
            color,
            auto,
        } => {
            out.push(Envelope::all(OutboundMessage::info(format!(
                "{} is the {} player",
                nickname(game, *player),
                color
            ))));
            if *auto {
                out.push(Envelope::single(
                    *player,
                    OutboundMessage::info(format!(
                        "The society decides for you! You are the {color} player."
                    )),
                ));
            }
        }
        GameEvent::GodAdded { god } => {
            out.push(Envelope::all(OutboundMessage::info(format!(
                "{god} has been added to the deck"
            ))));
        }
        GameEvent::GodAssigned { player, god } => {
            out.push(Envelope::all(OutboundMessage::info(format!(
                "{} received {}",
                nickname(game, *player),
                god
            ))));
        }
        GameEvent::StartingPlayerChosen { player } => {
            out.push(Envelope::all(OutboundMessage::info(format!(
                "{} will start",
                nickname(game, *player)
            ))));
        }
        GameEvent::WorkersPlaced {
            player,
            color,
            first,
            second,
        } => {
            out.push(Envelope::all(OutboundMessage::WorkersPlaced {
                nickname: nickname(game, *player),
                color: *color,
                positions: [*first, *second],
            }));
        }
        GameEvent::WorkerMoved { mv } => {
            out.push(Envelope::all(OutboundMessage::WorkerMoved { mv: *mv }));
        }
        GameEvent::DoubleMove {
            acting,
            displaced,
            god,
        } => {
            out.push(Envelope::all(OutboundMessage::DoubleMove {
                acting: *acting,
                displaced: *displaced,
                god: *god,
            }));
        }
        GameEvent::BlockBuilt { coord, level, dome } => {
            out.push(Envelope::all(OutboundMessage::BlockBuilt {
                coord: *coord,
                level: *level,
                dome: *dome,
            }));
        }
        GameEvent::TurnStarted { player } => {
            out.push(Envelope::all(OutboundMessage::TurnStarted {
                nickname: nickname(game, *player),
            }));
        }
        GameEvent::WinAchieved { player } => {
            out.push(Envelope::all(OutboundMessage::WinAnnounced {
                nickname: nickname(game, *player),
            }));
        }
        GameEvent::PlayerRemoved { player } => {
            out.push(Envelope::all_except(
                *player,
                OutboundMessage::info(format!("{} left the match", nickname(game, *player))),
            ));
        }
        GameEvent::MatchEnded { reason } => {
            let text = match reason {
                EndReason::Victory { winner } => {
                    format!("{} has won the match", nickname(game, *winner))
                }
                EndReason::Desertion { player } => format!(
                    "{} left; the match cannot continue",
                    nickname(game, *player)
                ),
            };
            out.push(Envelope::all(OutboundMessage::MatchEnded { reason: text }));
        }
    }
    out
}
