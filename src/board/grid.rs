//! The 5x5 board.
//!
//! Bounds checking plus storage, nothing else. The rule engine asks the
//! board questions; only the `Game` aggregate mutates it, keeping space
//! occupancy and worker positions in lockstep.

use serde::{Deserialize, Serialize};

use super::space::{Coord, Space, BOARD_SIZE};
use crate::core::ActionError;
use crate::workers::WorkerId;

/// The 25 spaces of one match, row-major.
///
/// ```
/// use santorini_engine::board::{Board, Coord};
///
/// let board = Board::new();
/// assert!(board.space(Coord::new(4, 4)).is_ok());
/// assert!(board.space(Coord::new(5, 0)).is_err());
/// assert_eq!(board.empty_spaces().len(), 25);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    spaces: Vec<Space>,
}

impl Board {
    /// A fresh board: all towers at ground level, no workers.
    #[must_use]
    pub fn new() -> Self {
        let count = BOARD_SIZE as usize * BOARD_SIZE as usize;
        Self {
            spaces: (0..count).map(|_| Space::new()).collect(),
        }
    }

    fn index(coord: Coord) -> usize {
        coord.row as usize * BOARD_SIZE as usize + coord.col as usize
    }

    /// Whether a coordinate lies on the board.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.in_bounds()
    }

    /// Look up a space, rejecting off-board coordinates.
    pub fn space(&self, coord: Coord) -> Result<&Space, ActionError> {
        if coord.in_bounds() {
            Ok(&self.spaces[Self::index(coord)])
        } else {
            Err(ActionError::CoordOutOfBound {
                row: coord.row,
                col: coord.col,
            })
        }
    }

    /// Mutable space access for the aggregate.
    ///
    /// # Panics
    ///
    /// Panics off-board; callers validate coordinates first.
    pub(crate) fn space_mut(&mut self, coord: Coord) -> &mut Space {
        assert!(coord.in_bounds(), "coordinate {coord} is off the board");
        &mut self.spaces[Self::index(coord)]
    }

    /// The worker standing at `coord`, if the coordinate is on the board
    /// and someone stands there.
    #[must_use]
    pub fn occupant(&self, coord: Coord) -> Option<WorkerId> {
        self.space(coord).ok().and_then(Space::occupant)
    }

    /// All spaces with no worker on them, row-major order.
    #[must_use]
    pub fn empty_spaces(&self) -> Vec<Coord> {
        self.iter()
            .filter(|(_, space)| space.is_empty())
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Iterate over every `(Coord, &Space)` pair, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Space)> {
        self.spaces.iter().enumerate().map(|(i, space)| {
            let size = BOARD_SIZE as usize;
            (Coord::new((i / size) as u8, (i % size) as u8), space)
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_new_board_is_flat_and_empty() {
        let board = Board::new();
        assert_eq!(board.iter().count(), 25);
        for (_, space) in board.iter() {
            assert_eq!(space.tower().level(), 0);
            assert!(space.is_empty());
        }
    }

    #[test]
    fn test_space_bounds() {
        let board = Board::new();
        assert!(board.space(Coord::new(0, 0)).is_ok());
        assert!(board.space(Coord::new(4, 4)).is_ok());

        let err = board.space(Coord::new(5, 2)).unwrap_err();
        assert_eq!(err, ActionError::CoordOutOfBound { row: 5, col: 2 });
        assert!(board.space(Coord::new(0, 200)).is_err());
    }

    #[test]
    fn test_occupant_lookup() {
        let mut board = Board::new();
        let id = WorkerId::new(PlayerId::new(0), 0);
        let coord = Coord::new(2, 3);

        assert_eq!(board.occupant(coord), None);
        board.space_mut(coord).set_occupant(Some(id));
        assert_eq!(board.occupant(coord), Some(id));

        // Off-board lookups are just "nobody there".
        assert_eq!(board.occupant(Coord::new(9, 9)), None);
    }

    #[test]
    fn test_empty_spaces_shrink() {
        let mut board = Board::new();
        assert_eq!(board.empty_spaces().len(), 25);

        let id = WorkerId::new(PlayerId::new(1), 0);
        board.space_mut(Coord::new(0, 0)).set_occupant(Some(id));

        let empty = board.empty_spaces();
        assert_eq!(empty.len(), 24);
        assert!(!empty.contains(&Coord::new(0, 0)));
    }

    #[test]
    fn test_iter_is_row_major() {
        let board = Board::new();
        let coords: Vec<_> = board.iter().map(|(c, _)| c).collect();
        assert_eq!(coords[0], Coord::new(0, 0));
        assert_eq!(coords[4], Coord::new(0, 4));
        assert_eq!(coords[5], Coord::new(1, 0));
        assert_eq!(coords[24], Coord::new(4, 4));
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_space_mut_panics_off_board() {
        let mut board = Board::new();
        let _ = board.space_mut(Coord::new(5, 5));
    }

    #[test]
    fn test_board_serialization() {
        let mut board = Board::new();
        board.space_mut(Coord::new(1, 1)).tower_mut().add_level();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
