//! Movement, build, and win evaluation.
//!
//! ## Planning, not mutating
//!
//! Nothing here touches the board. `plan_move` and `plan_build` answer
//! "is this legal, and what exactly would happen" as a plan value; the
//! `Game` aggregate applies plans atomically. A compound move (Apollo
//! swap, Minotaur push) is therefore rejected whole or applied whole,
//! never half-done.
//!
//! ## Base contract
//!
//! A worker may step to one of the 8 neighboring spaces that is on the
//! board, at most one level above its own, not a complete tower, and
//! empty. Powers relax individual clauses; see [`GodPower`].

use serde::{Deserialize, Serialize};

use super::worker::{Worker, WorkerId};
use crate::board::{Board, Coord, MAX_LEVEL};
use crate::gods::GodPower;

/// One worker's transition from one space to another.
///
/// Compound moves produce a pair of records whose `from`/`to` describe
/// both affected workers; an Apollo swap's records are exact inverses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub worker: WorkerId,
    pub from: Coord,
    pub to: Coord,
}

/// A validated move, ready to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePlan {
    /// The acting worker's transition.
    pub mv: MoveRecord,
    /// The opponent worker displaced by Apollo or Minotaur, if any.
    pub displaced: Option<MoveRecord>,
    /// Tower level the acting worker leaves.
    pub from_level: u8,
    /// Tower level the acting worker arrives at.
    pub to_level: u8,
}

/// A validated build, ready to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    pub builder: WorkerId,
    pub target: Coord,
    /// Place a dome instead of a block.
    pub dome: bool,
}

/// Evaluate a move. `None` means the target is not selectable; the
/// board is untouched either way.
#[must_use]
pub fn plan_move(board: &Board, worker: &Worker, target: Coord) -> Option<MovePlan> {
    let from = worker.position()?;
    if !from.is_adjacent(target) {
        return None;
    }
    let from_space = board.space(from).ok()?;
    let to_space = board.space(target).ok()?;

    let from_level = from_space.tower().level();
    let to_level = to_space.tower().level();
    if to_level > from_level + 1 {
        return None;
    }
    if to_space.tower().is_complete() {
        return None;
    }

    let mv = MoveRecord {
        worker: worker.id(),
        from,
        to: target,
    };

    let occupant = match to_space.occupant() {
        None => {
            return Some(MovePlan {
                mv,
                displaced: None,
                from_level,
                to_level,
            })
        }
        Some(other) => other,
    };

    // A player's own workers share a color; no power moves onto them.
    if occupant.player == worker.id().player {
        return None;
    }

    let displaced = match worker.power() {
        GodPower::Apollo => MoveRecord {
            worker: occupant,
            from: target,
            to: from,
        },
        GodPower::Minotaur => {
            let forced = forced_destination(from, target)?;
            let forced_space = board.space(forced).ok()?;
            if !forced_space.is_empty() || forced_space.tower().is_complete() {
                return None;
            }
            MoveRecord {
                worker: occupant,
                from: target,
                to: forced,
            }
        }
        _ => return None,
    };

    Some(MovePlan {
        mv,
        displaced: Some(displaced),
        from_level,
        to_level,
    })
}

/// Where a Minotaur victim lands: one more step along the move line.
/// `None` if that step leaves the board.
fn forced_destination(from: Coord, target: Coord) -> Option<Coord> {
    let dr = target.row as i8 - from.row as i8;
    let dc = target.col as i8 - from.col as i8;
    target.offset(dr, dc)
}

/// Whether `target` is a legal move for `worker` right now.
#[must_use]
pub fn is_selectable(board: &Board, worker: &Worker, target: Coord) -> bool {
    plan_move(board, worker, target).is_some()
}

/// All legal move targets for `worker`. Empty for unplaced workers and
/// for workers with nowhere to go.
#[must_use]
pub fn select_moves(board: &Board, worker: &Worker) -> Vec<Coord> {
    match worker.position() {
        Some(from) => from
            .neighbors()
            .into_iter()
            .filter(|&target| is_selectable(board, worker, target))
            .collect(),
        None => Vec::new(),
    }
}

/// Evaluate a build. `None` means the build is not legal.
///
/// The base rule adds one block below full height; at full height only
/// a dome may be placed. Atlas may place the dome at any level.
#[must_use]
pub fn plan_build(
    board: &Board,
    worker: &Worker,
    target: Coord,
    wants_dome: bool,
) -> Option<BuildPlan> {
    let from = worker.position()?;
    if !from.is_adjacent(target) {
        return None;
    }
    let space = board.space(target).ok()?;
    if !space.is_empty() || space.tower().has_dome() {
        return None;
    }

    let level = space.tower().level();
    let legal = if wants_dome {
        level == MAX_LEVEL || worker.power().allows_early_dome()
    } else {
        level < MAX_LEVEL
    };

    legal.then_some(BuildPlan {
        builder: worker.id(),
        target,
        dome: wants_dome,
    })
}

/// Whether a move from `from_level` to `to_level` wins.
///
/// Base rule: arriving on level 3 from below. Pan also wins by dropping
/// two or more levels.
#[must_use]
pub fn is_winning_move(power: GodPower, from_level: u8, to_level: u8) -> bool {
    if to_level == 3 && from_level < 3 {
        return true;
    }
    power.wins_on_descent() && from_level >= to_level + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerColor, PlayerId};

    fn worker(player: u8, slot: u8, power: GodPower, at: Coord) -> Worker {
        let mut w = Worker::new(
            WorkerId::new(PlayerId::new(player), slot),
            PlayerColor::Red,
            power,
        );
        w.set_position(Some(at));
        w
    }

    fn put(board: &mut Board, worker: &Worker) {
        let at = worker.position().unwrap();
        board.space_mut(at).set_occupant(Some(worker.id()));
    }

    fn raise(board: &mut Board, coord: Coord, level: u8) {
        for _ in 0..level {
            assert!(board.space_mut(coord).tower_mut().add_level());
        }
    }

    #[test]
    fn test_plain_step() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(2, 2));
        put(&mut board, &w);

        let plan = plan_move(&board, &w, Coord::new(2, 3)).unwrap();
        assert_eq!(plan.mv.from, Coord::new(2, 2));
        assert_eq!(plan.mv.to, Coord::new(2, 3));
        assert!(plan.displaced.is_none());
    }

    #[test]
    fn test_unplaced_worker_cannot_move() {
        let board = Board::new();
        let w = Worker::new(
            WorkerId::new(PlayerId::new(0), 0),
            PlayerColor::Blue,
            GodPower::Normal,
        );
        assert!(plan_move(&board, &w, Coord::new(0, 0)).is_none());
        assert!(select_moves(&board, &w).is_empty());
    }

    #[test]
    fn test_adjacency_required() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(0, 0));
        put(&mut board, &w);

        assert!(plan_move(&board, &w, Coord::new(0, 2)).is_none());
        assert!(plan_move(&board, &w, Coord::new(2, 2)).is_none());
        // A space is not adjacent to itself.
        assert!(plan_move(&board, &w, Coord::new(0, 0)).is_none());
    }

    #[test]
    fn test_climb_at_most_one() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(2, 2));
        put(&mut board, &w);

        raise(&mut board, Coord::new(2, 3), 1);
        assert!(is_selectable(&board, &w, Coord::new(2, 3)));

        raise(&mut board, Coord::new(3, 2), 2);
        assert!(!is_selectable(&board, &w, Coord::new(3, 2)));
    }

    #[test]
    fn test_descend_any_height() {
        let mut board = Board::new();
        raise(&mut board, Coord::new(2, 2), 3);
        let w = worker(0, 0, GodPower::Normal, Coord::new(2, 2));
        put(&mut board, &w);

        assert!(is_selectable(&board, &w, Coord::new(2, 3)));
    }

    #[test]
    fn test_complete_towers_block_movement() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(2, 2));
        put(&mut board, &w);

        // Domed low tower.
        raise(&mut board, Coord::new(2, 3), 1);
        board.space_mut(Coord::new(2, 3)).tower_mut().set_dome(true);
        assert!(!is_selectable(&board, &w, Coord::new(2, 3)));

        // Full-height tower, no dome yet: still complete.
        raise(&mut board, Coord::new(2, 2), 3);
        raise(&mut board, Coord::new(3, 2), 4);
        assert!(!is_selectable(&board, &w, Coord::new(3, 2)));
    }

    #[test]
    fn test_base_rule_rejects_occupied_targets() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(2, 2));
        let foe = worker(1, 0, GodPower::Normal, Coord::new(2, 3));
        put(&mut board, &w);
        put(&mut board, &foe);

        assert!(!is_selectable(&board, &w, Coord::new(2, 3)));
    }

    #[test]
    fn test_no_power_targets_own_worker() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Apollo, Coord::new(2, 2));
        let mate = worker(0, 1, GodPower::Apollo, Coord::new(2, 3));
        put(&mut board, &w);
        put(&mut board, &mate);

        assert!(!is_selectable(&board, &w, Coord::new(2, 3)));
    }

    #[test]
    fn test_apollo_swap_records_are_inverses() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Apollo, Coord::new(2, 2));
        let foe = worker(1, 1, GodPower::Normal, Coord::new(3, 3));
        put(&mut board, &w);
        put(&mut board, &foe);

        let plan = plan_move(&board, &w, Coord::new(3, 3)).unwrap();
        let displaced = plan.displaced.unwrap();

        assert_eq!(plan.mv.from, displaced.to);
        assert_eq!(plan.mv.to, displaced.from);
        assert_eq!(displaced.worker, foe.id());
    }

    #[test]
    fn test_minotaur_push_straight_back() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Minotaur, Coord::new(2, 2));
        let foe = worker(1, 0, GodPower::Normal, Coord::new(2, 3));
        put(&mut board, &w);
        put(&mut board, &foe);

        let plan = plan_move(&board, &w, Coord::new(2, 3)).unwrap();
        let displaced = plan.displaced.unwrap();
        assert_eq!(displaced.worker, foe.id());
        assert_eq!(displaced.from, Coord::new(2, 3));
        assert_eq!(displaced.to, Coord::new(2, 4));
    }

    #[test]
    fn test_minotaur_diagonal_push() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Minotaur, Coord::new(1, 1));
        let foe = worker(1, 0, GodPower::Normal, Coord::new(2, 2));
        put(&mut board, &w);
        put(&mut board, &foe);

        let plan = plan_move(&board, &w, Coord::new(2, 2)).unwrap();
        assert_eq!(plan.displaced.unwrap().to, Coord::new(3, 3));
    }

    #[test]
    fn test_minotaur_rejects_blocked_push() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Minotaur, Coord::new(2, 2));
        let foe = worker(1, 0, GodPower::Normal, Coord::new(2, 3));
        put(&mut board, &w);
        put(&mut board, &foe);

        // Occupied forced destination.
        let bystander = worker(1, 1, GodPower::Normal, Coord::new(2, 4));
        put(&mut board, &bystander);
        assert!(plan_move(&board, &w, Coord::new(2, 3)).is_none());
    }

    #[test]
    fn test_minotaur_rejects_push_off_board() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Minotaur, Coord::new(2, 3));
        let foe = worker(1, 0, GodPower::Normal, Coord::new(2, 4));
        put(&mut board, &w);
        put(&mut board, &foe);

        // Forced destination would be (2, 5): off the board.
        assert!(plan_move(&board, &w, Coord::new(2, 4)).is_none());
    }

    #[test]
    fn test_minotaur_rejects_push_onto_complete_tower() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Minotaur, Coord::new(2, 2));
        let foe = worker(1, 0, GodPower::Normal, Coord::new(2, 3));
        put(&mut board, &w);
        put(&mut board, &foe);

        raise(&mut board, Coord::new(2, 4), 4);
        assert!(plan_move(&board, &w, Coord::new(2, 3)).is_none());
    }

    #[test]
    fn test_minotaur_push_uphill_is_fine() {
        // The height rule binds the attacker, not the victim.
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Minotaur, Coord::new(2, 2));
        let foe = worker(1, 0, GodPower::Normal, Coord::new(2, 3));
        put(&mut board, &w);
        put(&mut board, &foe);

        raise(&mut board, Coord::new(2, 4), 3);
        let plan = plan_move(&board, &w, Coord::new(2, 3)).unwrap();
        assert_eq!(plan.displaced.unwrap().to, Coord::new(2, 4));
    }

    #[test]
    fn test_select_moves_enumerates_targets() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(0, 0));
        put(&mut board, &w);

        let moves = select_moves(&board, &w);
        assert_eq!(moves.len(), 3);

        // Box the worker in.
        raise(&mut board, Coord::new(0, 1), 2);
        raise(&mut board, Coord::new(1, 0), 2);
        raise(&mut board, Coord::new(1, 1), 2);
        assert!(select_moves(&board, &w).is_empty());
    }

    #[test]
    fn test_build_base_rule() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(2, 2));
        put(&mut board, &w);

        assert!(plan_build(&board, &w, Coord::new(2, 3), false).is_some());
        // Not adjacent.
        assert!(plan_build(&board, &w, Coord::new(2, 4), false).is_none());
        // Occupied.
        let foe = worker(1, 0, GodPower::Normal, Coord::new(3, 3));
        put(&mut board, &foe);
        assert!(plan_build(&board, &w, Coord::new(3, 3), false).is_none());
        // Own space.
        assert!(plan_build(&board, &w, Coord::new(2, 2), false).is_none());
    }

    #[test]
    fn test_build_dome_only_at_full_height() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Normal, Coord::new(2, 2));
        put(&mut board, &w);

        let target = Coord::new(2, 3);
        raise(&mut board, target, 3);
        assert!(plan_build(&board, &w, target, true).is_none());

        raise(&mut board, target, 1);
        // Level 4: a block no longer fits, a dome does.
        assert!(plan_build(&board, &w, target, false).is_none());
        assert!(plan_build(&board, &w, target, true).is_some());
    }

    #[test]
    fn test_atlas_domes_at_any_level() {
        let mut board = Board::new();
        let w = worker(0, 0, GodPower::Atlas, Coord::new(2, 2));
        put(&mut board, &w);

        assert!(plan_build(&board, &w, Coord::new(2, 3), true).is_some());

        // Already-domed spaces stay sealed even for Atlas.
        board.space_mut(Coord::new(3, 3)).tower_mut().set_dome(true);
        assert!(plan_build(&board, &w, Coord::new(3, 3), true).is_none());
    }

    #[test]
    fn test_win_on_arrival_at_level_three() {
        assert!(is_winning_move(GodPower::Normal, 2, 3));
        assert!(is_winning_move(GodPower::Apollo, 2, 3));
        // Already on 3: staying there is not a win.
        assert!(!is_winning_move(GodPower::Normal, 3, 3));
        assert!(!is_winning_move(GodPower::Normal, 1, 2));
    }

    #[test]
    fn test_pan_descent_win() {
        assert!(is_winning_move(GodPower::Pan, 2, 0));
        assert!(is_winning_move(GodPower::Pan, 3, 1));
        assert!(!is_winning_move(GodPower::Pan, 1, 0));
        // Base rule still applies to Pan.
        assert!(is_winning_move(GodPower::Pan, 2, 3));
        // Other powers do not win by descending.
        assert!(!is_winning_move(GodPower::Normal, 2, 0));
    }
}
