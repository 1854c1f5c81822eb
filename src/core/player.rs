//! Player identity, the color palette, and per-player roster records.
//!
//! ## PlayerId
//!
//! Type-safe roster index. The transport addresses players by `PlayerId`;
//! it stays stable for the whole match even when a player drops out.
//!
//! ## PlayerColor / ColorPool
//!
//! The fixed three-color palette. Each match owns its own `ColorPool`;
//! there is no shared palette state between matches.

use serde::{Deserialize, Serialize};

use crate::gods::GodName;
use crate::workers::{Worker, WorkerId};

/// Player identifier, a stable 0-based roster index.
///
/// ```
/// use santorini_engine::core::PlayerId;
///
/// let p = PlayerId::new(1);
/// assert_eq!(p.index(), 1);
/// assert_eq!(format!("{}", p), "Player 1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw roster index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Worker colors. One per player, drawn from a per-match [`ColorPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Green,
    Blue,
}

impl PlayerColor {
    /// Every color, in pick order.
    pub const ALL: [PlayerColor; 3] = [PlayerColor::Red, PlayerColor::Green, PlayerColor::Blue];

    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayerColor::Red => "Red",
            PlayerColor::Green => "Green",
            PlayerColor::Blue => "Blue",
        }
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The colors still up for grabs in one match.
///
/// Owned by the `Game` aggregate so two concurrent matches never share
/// palette state.
///
/// ```
/// use santorini_engine::core::{ColorPool, PlayerColor};
///
/// let mut pool = ColorPool::new();
/// assert!(pool.take(PlayerColor::Green));
/// assert!(!pool.take(PlayerColor::Green));
/// assert_eq!(pool.remaining().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPool {
    remaining: Vec<PlayerColor>,
}

impl ColorPool {
    /// A full pool with all three colors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            remaining: PlayerColor::ALL.to_vec(),
        }
    }

    /// Colors not yet taken, in pick order.
    #[must_use]
    pub fn remaining(&self) -> &[PlayerColor] {
        &self.remaining
    }

    /// Whether a color is still available.
    #[must_use]
    pub fn is_available(&self, color: PlayerColor) -> bool {
        self.remaining.contains(&color)
    }

    /// Take a color out of the pool. Returns `false` if it was already taken.
    pub fn take(&mut self, color: PlayerColor) -> bool {
        match self.remaining.iter().position(|&c| c == color) {
            Some(i) => {
                self.remaining.remove(i);
                true
            }
            None => false,
        }
    }

    /// The single leftover color, if exactly one remains.
    #[must_use]
    pub fn sole_remaining(&self) -> Option<PlayerColor> {
        match self.remaining.as_slice() {
            [color] => Some(*color),
            _ => None,
        }
    }
}

impl Default for ColorPool {
    fn default() -> Self {
        Self::new()
    }
}

/// One roster entry: nickname, setup picks, and the player's two workers.
///
/// Workers do not exist until a god is assigned; after assignment the
/// player owns exactly two, addressed by slot 0 and 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    nickname: String,
    color: Option<PlayerColor>,
    god: Option<GodName>,
    workers: Vec<Worker>,
    active: bool,
}

impl Player {
    /// Create an active player with no setup picks made yet.
    #[must_use]
    pub fn new(id: PlayerId, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            color: None,
            god: None,
            workers: Vec::new(),
            active: true,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    #[must_use]
    pub fn color(&self) -> Option<PlayerColor> {
        self.color
    }

    #[must_use]
    pub fn god(&self) -> Option<GodName> {
        self.god
    }

    /// Whether the player is still part of the match.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The player's workers: empty before god assignment, two after.
    #[must_use]
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Look up a worker by slot.
    #[must_use]
    pub fn worker(&self, slot: u8) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id().slot == slot)
    }

    /// Whether both workers exist and stand on the board.
    #[must_use]
    pub fn has_placed_workers(&self) -> bool {
        self.workers.len() == 2 && self.workers.iter().all(|w| w.position().is_some())
    }

    pub(crate) fn worker_mut(&mut self, slot: u8) -> Option<&mut Worker> {
        self.workers.iter_mut().find(|w| w.id().slot == slot)
    }

    pub(crate) fn set_color(&mut self, color: PlayerColor) {
        self.color = Some(color);
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Record the assigned god and spawn the two workers it comes with.
    pub(crate) fn assign_god(&mut self, god: GodName, color: PlayerColor) {
        self.god = Some(god);
        self.workers = (0..2)
            .map(|slot| Worker::new(WorkerId::new(self.id, slot), color, god.power()))
            .collect();
    }
}
