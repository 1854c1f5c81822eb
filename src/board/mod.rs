//! Board data model: the 5x5 grid of spaces and their towers.

pub mod grid;
pub mod space;

pub use grid::Board;
pub use space::{Coord, Space, Tower, BOARD_SIZE, MAX_LEVEL};
