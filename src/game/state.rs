//! The match aggregate.
//!
//! `Game` owns every piece of per-match state: board, roster, deck,
//! color pool, the pending event queue, and the action history. All
//! mutation funnels through it, and every mutating operation appends
//! the events observers need, so state changes and notifications cannot
//! drift apart.
//!
//! ## Occupancy agreement
//!
//! `Space::occupant` and `Worker::position` are two views of one fact.
//! The only code that writes either is the private `attach`/`detach`
//! pair, which always updates both. They panic on disagreement; such a
//! panic is an engine bug, not a user error.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::events::{EndReason, GameEvent};
use crate::board::{Board, Coord};
use crate::core::{Action, ActionError, ActionRecord, ColorPool, Player, PlayerColor, PlayerId};
use crate::gods::{Deck, DeckError, GodName};
use crate::workers::{self, Worker, WorkerId};

/// Maximum roster size.
pub const MAX_PLAYERS: usize = 3;

/// Full state of one match.
///
/// The aggregate validates rules, not phases: callers (normally the
/// [`MatchController`](crate::controller::MatchController)) decide
/// *when* an operation is allowed, `Game` decides *whether* it is
/// legal on the current board and roster. Rejected operations leave
/// the state untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    current: usize,
    deck: Deck,
    colors: ColorPool,
    turn: u32,
    winner: Option<PlayerId>,
    events: Vec<GameEvent>,
    history: Vector<ActionRecord>,
}

impl Game {
    /// An empty match: no players, flat board, full color pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            players: Vec::new(),
            current: 0,
            deck: Deck::new(0),
            colors: ColorPool::new(),
            turn: 0,
            winner: None,
            events: Vec::new(),
            history: Vector::new(),
        }
    }

    // ---- roster ----

    /// Register a player. Nicknames must be unique: the transport keys
    /// its setup maps by nickname.
    pub fn add_player(&mut self, nickname: impl Into<String>) -> Result<PlayerId, ActionError> {
        let nickname = nickname.into();
        if self.players.len() >= MAX_PLAYERS {
            return Err(ActionError::ProtocolViolation {
                reason: "the roster is full",
            });
        }
        if self.players.iter().any(|p| p.nickname() == nickname) {
            return Err(ActionError::ProtocolViolation {
                reason: "that nickname is taken",
            });
        }
        let id = PlayerId::new(self.players.len() as u8);
        self.players.push(Player::new(id, nickname));
        Ok(id)
    }

    /// Deactivate a player and tell everyone. The roster entry stays so
    /// `PlayerId`s remain stable.
    pub fn remove_player(&mut self, id: PlayerId) {
        if let Some(player) = self.players.get_mut(id.index()) {
            if player.is_active() {
                player.set_active(false);
                self.events.push(GameEvent::PlayerRemoved { player: id });
            }
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Active players in roster order.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// Active player IDs in roster order. Starting-player indices are
    /// offsets into this list.
    #[must_use]
    pub fn active_player_ids(&self) -> Vec<PlayerId> {
        self.active_players().map(Player::id).collect()
    }

    /// The player whose turn (or setup step) it is.
    ///
    /// # Panics
    ///
    /// Panics on an empty roster.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub(crate) fn set_current(&mut self, id: PlayerId) {
        assert!(id.index() < self.players.len(), "unknown {id}");
        self.current = id.index();
    }

    /// The next active player after `id`, round-robin.
    ///
    /// # Panics
    ///
    /// Panics if nobody is active.
    #[must_use]
    pub fn next_active_after(&self, id: PlayerId) -> PlayerId {
        assert!(
            self.players.iter().any(Player::is_active),
            "no active players"
        );
        let len = self.players.len();
        let mut i = (id.index() + 1) % len;
        while !self.players[i].is_active() {
            i = (i + 1) % len;
        }
        self.players[i].id()
    }

    // ---- colors ----

    #[must_use]
    pub fn colors(&self) -> &ColorPool {
        &self.colors
    }

    /// The first active player still without a color, roster order.
    #[must_use]
    pub fn first_uncolored(&self) -> Option<PlayerId> {
        self.active_players()
            .find(|p| p.color().is_none())
            .map(Player::id)
    }

    /// Claim a color for a player.
    pub fn assign_color(&mut self, id: PlayerId, color: PlayerColor) -> Result<(), ActionError> {
        let player = self.players.get(id.index()).ok_or(ActionError::ProtocolViolation {
            reason: "unknown player",
        })?;
        if player.color().is_some() {
            return Err(ActionError::ProtocolViolation {
                reason: "you already have a color",
            });
        }
        if !self.colors.take(color) {
            return Err(ActionError::ProtocolViolation {
                reason: "that color is taken",
            });
        }
        self.players[id.index()].set_color(color);
        self.events.push(GameEvent::ColorAssigned {
            player: id,
            color,
            auto: false,
        });
        Ok(())
    }

    /// Hand the last color to the last chooser, if the pool is down to
    /// one color and exactly one active player has none.
    pub fn auto_assign_last_color(&mut self) -> Option<(PlayerId, PlayerColor)> {
        let color = self.colors.sole_remaining()?;
        let mut uncolored = self.active_players().filter(|p| p.color().is_none());
        let player = uncolored.next()?.id();
        if uncolored.next().is_some() {
            return None;
        }
        drop(uncolored);
        self.colors.take(color);
        self.players[player.index()].set_color(color);
        self.events.push(GameEvent::ColorAssigned {
            player,
            color,
            auto: true,
        });
        Some((player, color))
    }

    // ---- deck and gods ----

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub(crate) fn init_deck(&mut self, capacity: usize) {
        self.deck = Deck::new(capacity);
    }

    /// Challenger adds a god to the deck.
    pub fn add_god_to_deck(&mut self, god: GodName) -> Result<(), DeckError> {
        self.deck.add(god)?;
        self.events.push(GameEvent::GodAdded { god });
        Ok(())
    }

    /// Give a deck card to a player, spawning their two workers.
    pub fn assign_god(&mut self, id: PlayerId, god: GodName) -> Result<(), ActionError> {
        let player = self.players.get(id.index()).ok_or(ActionError::ProtocolViolation {
            reason: "unknown player",
        })?;
        if player.god().is_some() {
            return Err(ActionError::ProtocolViolation {
                reason: "you already have a god",
            });
        }
        let color = player.color().ok_or(ActionError::ProtocolViolation {
            reason: "choose a color first",
        })?;
        if !self.deck.remove(god) {
            return Err(ActionError::ProtocolViolation {
                reason: "that god is not in the deck",
            });
        }
        self.players[id.index()].assign_god(god, color);
        self.events.push(GameEvent::GodAssigned { player: id, god });
        Ok(())
    }

    // ---- board mutation ----

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Put a player's two workers on the board.
    ///
    /// Both coordinates must be on the board, distinct, and empty. Any
    /// violation rejects the whole placement with the offending
    /// coordinates and changes nothing.
    pub fn place_workers(
        &mut self,
        id: PlayerId,
        first: Coord,
        second: Coord,
    ) -> Result<(), ActionError> {
        let player = self.players.get(id.index()).ok_or(ActionError::ProtocolViolation {
            reason: "unknown player",
        })?;
        if player.workers().len() != 2 {
            return Err(ActionError::ProtocolViolation {
                reason: "no workers to place yet",
            });
        }
        if player.has_placed_workers() {
            return Err(ActionError::ProtocolViolation {
                reason: "workers already placed",
            });
        }

        self.board.space(first)?;
        self.board.space(second)?;

        let mut occupied = Vec::new();
        if self.board.occupant(first).is_some() {
            occupied.push(first);
        }
        if second == first || self.board.occupant(second).is_some() {
            occupied.push(second);
        }
        if !occupied.is_empty() {
            return Err(ActionError::RuleViolation { coords: occupied });
        }

        let color = player.workers()[0].color();
        self.attach(WorkerId::new(id, 0), first);
        self.attach(WorkerId::new(id, 1), second);
        self.events.push(GameEvent::WorkersPlaced {
            player: id,
            color,
            first,
            second,
        });
        Ok(())
    }

    /// Move a worker. Returns `false` (and changes nothing) if the
    /// target is not selectable under the worker's power.
    ///
    /// A winning move records [`GameEvent::WinAchieved`] and sets
    /// [`winner`](Game::winner); the caller decides how to end the
    /// match.
    pub fn move_worker(&mut self, id: WorkerId, target: Coord) -> bool {
        let worker = match self.worker(id) {
            Some(w) => w,
            None => return false,
        };
        let power = worker.power();
        let plan = match workers::plan_move(&self.board, worker, target) {
            Some(plan) => plan,
            None => return false,
        };

        self.detach(plan.mv.worker);
        if let Some(displaced) = plan.displaced {
            self.detach(displaced.worker);
            self.attach(displaced.worker, displaced.to);
        }
        self.attach(plan.mv.worker, plan.mv.to);

        let god = self.players[id.player.index()].god();
        match (plan.displaced, god) {
            (Some(displaced), Some(god)) => self.events.push(GameEvent::DoubleMove {
                acting: plan.mv,
                displaced,
                god,
            }),
            _ => self.events.push(GameEvent::WorkerMoved { mv: plan.mv }),
        }

        if workers::is_winning_move(power, plan.from_level, plan.to_level) {
            self.winner = Some(id.player);
            self.events.push(GameEvent::WinAchieved { player: id.player });
        }
        true
    }

    /// Build with a worker. Returns `false` (and changes nothing) if
    /// the build is not legal.
    pub fn build_at(&mut self, id: WorkerId, target: Coord, wants_dome: bool) -> bool {
        let worker = match self.worker(id) {
            Some(w) => w,
            None => return false,
        };
        let plan = match workers::plan_build(&self.board, worker, target, wants_dome) {
            Some(plan) => plan,
            None => return false,
        };

        let tower = self.board.space_mut(plan.target).tower_mut();
        if plan.dome {
            tower.set_dome(true);
        } else {
            let added = tower.add_level();
            assert!(added, "validated build failed at {target}");
        }
        let (level, dome) = (tower.level(), tower.has_dome());
        self.events.push(GameEvent::BlockBuilt {
            coord: plan.target,
            level,
            dome,
        });
        true
    }

    // ---- turn flow ----

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Start a turn for the current player.
    pub fn begin_turn(&mut self) {
        self.turn += 1;
        self.events.push(GameEvent::TurnStarted {
            player: self.current_player().id(),
        });
    }

    /// Rotate to the next active player and start their turn.
    pub fn advance_turn(&mut self) {
        let next = self.next_active_after(self.current_player().id());
        self.set_current(next);
        self.begin_turn();
    }

    /// Record the end of the match.
    pub fn end_match(&mut self, reason: EndReason) {
        self.events.push(GameEvent::MatchEnded { reason });
    }

    // ---- workers ----

    #[must_use]
    pub fn worker(&self, id: WorkerId) -> Option<&Worker> {
        self.players.get(id.player.index())?.worker(id.slot)
    }

    /// Every worker in the match, placed or not.
    pub fn workers(&self) -> impl Iterator<Item = &Worker> {
        self.players.iter().flat_map(|p| p.workers().iter())
    }

    /// Legal move targets for a worker; empty for unknown workers.
    #[must_use]
    pub fn selectable_moves(&self, id: WorkerId) -> Vec<Coord> {
        match self.worker(id) {
            Some(worker) => workers::select_moves(&self.board, worker),
            None => Vec::new(),
        }
    }

    // ---- events and history ----

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Append an event for a controller-level mutation (the starting
    /// player pick has no aggregate counterpart).
    pub(crate) fn record_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events not yet drained.
    #[must_use]
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Append an accepted action to the history. `turn` is the turn the
    /// action was taken in, captured before any rotation it caused.
    pub fn record_action(&mut self, player: PlayerId, action: Action, turn: u32) {
        self.history.push_back(ActionRecord::new(player, action, turn));
    }

    /// Every accepted action so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // ---- occupancy plumbing ----

    fn worker_mut(&mut self, id: WorkerId) -> &mut Worker {
        match self
            .players
            .get_mut(id.player.index())
            .and_then(|p| p.worker_mut(id.slot))
        {
            Some(worker) => worker,
            None => panic!("unknown {id}"),
        }
    }

    fn attach(&mut self, id: WorkerId, coord: Coord) {
        let space = self.board.space_mut(coord);
        assert!(space.is_empty(), "space {coord} is already occupied");
        space.set_occupant(Some(id));
        self.worker_mut(id).set_position(Some(coord));
    }

    fn detach(&mut self, id: WorkerId) {
        let position = self.worker(id).and_then(Worker::position);
        let coord = match position {
            Some(coord) => coord,
            None => panic!("{id} is not on the board"),
        };
        self.board.space_mut(coord).set_occupant(None);
        self.worker_mut(id).set_position(None);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
