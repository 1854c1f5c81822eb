//! Worker pieces.

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::core::{PlayerColor, PlayerId};
use crate::gods::GodPower;

/// Identifies one of a player's two workers.
///
/// ```
/// use santorini_engine::core::PlayerId;
/// use santorini_engine::workers::WorkerId;
///
/// let id = WorkerId::new(PlayerId::new(1), 0);
/// assert_eq!(format!("{}", id), "Worker 0 of Player 1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId {
    /// Owning player.
    pub player: PlayerId,
    /// Slot 0 or 1.
    pub slot: u8,
}

impl WorkerId {
    /// Create a worker ID.
    #[must_use]
    pub const fn new(player: PlayerId, slot: u8) -> Self {
        Self { player, slot }
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Worker {} of {}", self.slot, self.player)
    }
}

/// One worker piece: owner's color, the god power it plays with, and
/// where it stands.
///
/// `position` is `None` between god assignment and worker placement.
/// Once placed it always mirrors the board's `Space::occupant`; the
/// `Game` aggregate updates both sides together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    id: WorkerId,
    color: PlayerColor,
    power: GodPower,
    position: Option<Coord>,
}

impl Worker {
    /// Create an unplaced worker.
    #[must_use]
    pub const fn new(id: WorkerId, color: PlayerColor, power: GodPower) -> Self {
        Self {
            id,
            color,
            power,
            position: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    #[must_use]
    pub const fn color(&self) -> PlayerColor {
        self.color
    }

    #[must_use]
    pub const fn power(&self) -> GodPower {
        self.power
    }

    /// Where the worker stands, `None` before placement.
    #[must_use]
    pub const fn position(&self) -> Option<Coord> {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Option<Coord>) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_starts_unplaced() {
        let id = WorkerId::new(PlayerId::new(0), 1);
        let worker = Worker::new(id, PlayerColor::Green, GodPower::Pan);

        assert_eq!(worker.id(), id);
        assert_eq!(worker.color(), PlayerColor::Green);
        assert_eq!(worker.power(), GodPower::Pan);
        assert_eq!(worker.position(), None);
    }

    #[test]
    fn test_worker_placement() {
        let mut worker = Worker::new(
            WorkerId::new(PlayerId::new(1), 0),
            PlayerColor::Red,
            GodPower::Normal,
        );

        worker.set_position(Some(Coord::new(2, 2)));
        assert_eq!(worker.position(), Some(Coord::new(2, 2)));
    }

    #[test]
    fn test_worker_id_display() {
        let id = WorkerId::new(PlayerId::new(2), 1);
        assert_eq!(format!("{}", id), "Worker 1 of Player 2");
    }

    #[test]
    fn test_worker_serialization() {
        let mut worker = Worker::new(
            WorkerId::new(PlayerId::new(0), 0),
            PlayerColor::Blue,
            GodPower::Minotaur,
        );
        worker.set_position(Some(Coord::new(4, 0)));

        let json = serde_json::to_string(&worker).unwrap();
        let back: Worker = serde_json::from_str(&json).unwrap();
        assert_eq!(worker, back);
    }
}
