//! # santorini-engine
//!
//! A complete rule engine and match state machine for the board game
//! Santorini, covering the Apollo, Atlas, Minotaur, and Pan god powers.
//!
//! ## Design Principles
//!
//! 1. **No I/O**: The engine never touches sockets or timers. Actions
//!    come in, envelopes come out; the transport does the rest.
//!
//! 2. **Rejection Is Total**: A rejected action leaves the match state
//!    byte-for-byte unchanged and answers only its sender.
//!
//! 3. **Events Before Messages**: State changes append events; a single
//!    routing table turns events into messages. Notification behavior
//!    cannot drift from state behavior.
//!
//! ## Architecture
//!
//! - **Planning Before Mutation**: Moves and builds are validated into
//!   plans against an immutable board, then applied atomically. There
//!   is no rollback path because there is nothing to roll back.
//!
//! - **Deterministic Replay**: All randomness flows from one injected
//!   seed. Same seed, same actions, same transcript.
//!
//! - **Persistent History**: The action history uses `im` vectors, so
//!   snapshotting a match for audit or replay is O(1).
//!
//! ## Modules
//!
//! - `core`: Player identities, colors, actions, errors, RNG
//! - `board`: The 5x5 grid of towers and occupancy
//! - `gods`: God cards, the catalog, and the per-match deck
//! - `workers`: Worker pieces and the movement/build rules
//! - `game`: The match aggregate and its event queue
//! - `controller`: Phase machine, dispatch, and outbound messages

pub mod board;
pub mod controller;
pub mod core;
pub mod game;
pub mod gods;
pub mod workers;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionRecord,
    ColorPool, MatchRng,
    Player, PlayerColor, PlayerId,
};

pub use crate::board::{Board, Coord, Space, Tower, BOARD_SIZE, MAX_LEVEL};

pub use crate::gods::{Deck, DeckError, GodCard, GodCatalog, GodName, GodPower};

pub use crate::workers::{MoveRecord, Worker, WorkerId};

pub use crate::game::{EndReason, Game, GameEvent, MAX_PLAYERS};

pub use crate::controller::{
    DeliveryScope, Envelope, GameError, MatchController, MatchPhase,
    OutboundMessage, TurnStep,
};
