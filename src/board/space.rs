//! Coordinates, towers, and board spaces.
//!
//! ## Coord
//!
//! A position on the fixed 5x5 grid. `Coord` itself is just a pair of
//! `u8`s; off-grid values are representable and rejected by [`Board`]
//! lookups, so the transport's raw coordinates can flow straight in.
//!
//! ## Tower / Space
//!
//! Deliberately dumb storage. Towers know their level and dome flag,
//! spaces know their occupant; every rule about who may move or build
//! where lives in the worker rule engine, not here.
//!
//! [`Board`]: crate::board::Board

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::workers::WorkerId;

/// Side length of the square board.
pub const BOARD_SIZE: u8 = 5;

/// Highest buildable tower level. A dome on top of level 4 seals the
/// space for good.
pub const MAX_LEVEL: u8 = 4;

/// A board position.
///
/// ```
/// use santorini_engine::board::Coord;
///
/// let c = Coord::new(2, 2);
/// assert_eq!(c.neighbors().len(), 8);
/// assert!(c.is_adjacent(Coord::new(3, 3)));
/// assert!(!c.is_adjacent(c));
///
/// // Corners only have three neighbors.
/// assert_eq!(Coord::new(0, 0).neighbors().len(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    /// Create a coordinate. Not bounds-checked; `Board` lookups are.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Whether this coordinate lies on the board.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The coordinate `(dr, dc)` away, or `None` if it falls off the grid.
    #[must_use]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Coord> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if (0..BOARD_SIZE as i16).contains(&row) && (0..BOARD_SIZE as i16).contains(&col) {
            Some(Coord::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// The up-to-8 in-grid neighbors, row-major order.
    #[must_use]
    pub fn neighbors(self) -> SmallVec<[Coord; 8]> {
        let mut out = SmallVec::new();
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(coord) = self.offset(dr, dc) {
                    out.push(coord);
                }
            }
        }
        out
    }

    /// Chebyshev distance exactly 1. A space is never adjacent to itself.
    #[must_use]
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dr = (self.row as i16 - other.row as i16).abs();
        let dc = (self.col as i16 - other.col as i16).abs();
        dr <= 1 && dc <= 1 && (dr, dc) != (0, 0)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A stack of building blocks, possibly sealed by a dome.
///
/// Levels only ever go up. The dome flag is stored separately so Atlas
/// can seal a space below level 4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tower {
    level: u8,
    dome: bool,
}

impl Tower {
    /// A fresh ground-level tower.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 0,
            dome: false,
        }
    }

    /// Current level, 0 (ground) through [`MAX_LEVEL`].
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub const fn has_dome(&self) -> bool {
        self.dome
    }

    /// Complete towers block movement: domed, or built to full height.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.dome || self.level == MAX_LEVEL
    }

    /// Add one block. Returns `false` once the tower is at full height
    /// or domed; the tower is left unchanged.
    pub(crate) fn add_level(&mut self) -> bool {
        if self.dome || self.level >= MAX_LEVEL {
            return false;
        }
        self.level += 1;
        true
    }

    pub(crate) fn set_dome(&mut self, dome: bool) {
        self.dome = dome;
    }
}

/// One of the 25 board spaces: a tower plus at most one worker.
///
/// Spaces are created once at board init and never destroyed; identity
/// is positional. `occupant` mirrors `Worker::position` and the two are
/// only ever updated together by the `Game` aggregate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    tower: Tower,
    occupant: Option<WorkerId>,
}

impl Space {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tower: Tower::new(),
            occupant: None,
        }
    }

    #[must_use]
    pub const fn tower(&self) -> &Tower {
        &self.tower
    }

    /// The worker standing here, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<WorkerId> {
        self.occupant
    }

    /// Whether no worker stands here. Says nothing about the tower.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn tower_mut(&mut self) -> &mut Tower {
        &mut self.tower
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<WorkerId>) {
        self.occupant = occupant;
    }
}
