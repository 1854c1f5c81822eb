//! The match-phase controller.
//!
//! `MatchController` is the engine's front door: the transport feeds it
//! one action at a time and fans out the envelopes it returns. It owns
//! the phase machine, gates every action on the current phase and
//! actor, and converts aggregate events into outbound messages after
//! each accepted action.
//!
//! Rejections are total: a rejected action produces exactly one error
//! envelope for its sender and leaves the match state untouched.

use rustc_hash::FxHashMap;

use super::messages::{self, Envelope, OutboundMessage};
use super::phase::{MatchPhase, TurnStep};
use crate::board::{Coord, MAX_LEVEL};
use crate::core::{Action, ActionError, MatchRng, Player, PlayerColor, PlayerId};
use crate::game::{EndReason, Game, GameEvent};
use crate::gods::{DeckError, GodCatalog, GodName};
use crate::workers::WorkerId;

/// Outcome of a dispatched action.
///
/// `Ignored` covers soft rejections (a duplicate god add): the sender
/// gets an answer, but nothing changed and nothing is recorded.
enum Handled {
    Applied(Vec<Envelope>),
    Ignored(Vec<Envelope>),
}

/// Drives one match from lobby to end.
///
/// The controller processes actions strictly one at a time; the
/// transport serializes delivery per match. All randomness comes from
/// the injected seed, so a full match replays identically given the
/// same seed and action sequence.
pub struct MatchController {
    phase: MatchPhase,
    game: Game,
    rng: MatchRng,
    catalog: GodCatalog,
    declared_count: Option<u8>,
    challenger: Option<PlayerId>,
    starting: Option<PlayerId>,
    step: TurnStep,
}

impl MatchController {
    /// A fresh match in the lobby phase.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            phase: MatchPhase::Lobby,
            game: Game::new(),
            rng: MatchRng::new(seed),
            catalog: GodCatalog::new(),
            declared_count: None,
            challenger: None,
            starting: None,
            step: TurnStep::Move,
        }
    }

    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The randomly picked challenger; `None` until color selection
    /// completes.
    #[must_use]
    pub fn challenger(&self) -> Option<PlayerId> {
        self.challenger
    }

    /// The chosen starting player; `None` until the challenger picks.
    #[must_use]
    pub fn starting_player(&self) -> Option<PlayerId> {
        self.starting
    }

    /// Where the current turn stands; meaningful during TurnPlay.
    #[must_use]
    pub fn turn_step(&self) -> TurnStep {
        self.step
    }

    // ---- lobby API (called by the transport, not via actions) ----

    /// Register a player while the lobby is open.
    pub fn add_player(&mut self, nickname: impl Into<String>) -> Result<PlayerId, ActionError> {
        if self.phase != MatchPhase::Lobby {
            return Err(ActionError::PhaseViolation { phase: self.phase });
        }
        if let Some(count) = self.declared_count {
            if self.game.active_count() >= count as usize {
                return Err(ActionError::ProtocolViolation {
                    reason: "the roster is full",
                });
            }
        }
        self.game.add_player(nickname)
    }

    /// Drop a player. In the lobby this only shrinks the roster; once
    /// setup has begun the match cannot continue and ends for everyone.
    pub fn remove_player(&mut self, id: PlayerId) -> Vec<Envelope> {
        let was_active = self
            .game
            .player(id)
            .map_or(false, Player::is_active);
        self.game.remove_player(id);

        if was_active && !matches!(self.phase, MatchPhase::Lobby | MatchPhase::Ended) {
            log::info!("{id} left during {}; match over", self.phase);
            self.game.end_match(EndReason::Desertion { player: id });
            self.enter(MatchPhase::Ended);
        }
        self.flush()
    }

    /// Leave the lobby: validate the roster and start color selection.
    pub fn start(&mut self) -> Result<Vec<Envelope>, ActionError> {
        if self.phase != MatchPhase::Lobby {
            return Err(ActionError::PhaseViolation { phase: self.phase });
        }
        let count = self.declared_count.ok_or(ActionError::ProtocolViolation {
            reason: "player count not declared",
        })?;
        if self.game.active_count() != count as usize {
            return Err(ActionError::ProtocolViolation {
                reason: "the roster is not full",
            });
        }

        log::info!("setup started with {count} players");
        self.enter(MatchPhase::ColorSelection);
        let mut out = self.flush();
        out.extend(self.prompts());
        Ok(out)
    }

    // ---- action entry point ----

    /// Process one action from one player.
    ///
    /// Always returns the envelopes to deliver; a rejection is a single
    /// error envelope for the sender.
    pub fn handle(&mut self, actor: PlayerId, action: Action) -> Vec<Envelope> {
        let gate = match self.game.player(actor) {
            None => Some("unknown player"),
            Some(p) if !p.is_active() => Some("you are no longer in the match"),
            Some(_) => None,
        };
        if let Some(reason) = gate {
            let err = ActionError::ProtocolViolation { reason };
            log::debug!("rejected {} from {actor}: {err}", action.kind());
            return vec![Envelope::single(actor, OutboundMessage::rejection(&err))];
        }

        let turn = self.game.turn();
        let result = match (self.phase, action.clone()) {
            (MatchPhase::Lobby, Action::SelectPlayerCount { count }) => {
                self.on_select_count(actor, count)
            }
            (MatchPhase::ColorSelection, Action::SelectColor { color }) => {
                self.on_select_color(actor, color)
            }
            (MatchPhase::ChallengerSelection, Action::AddGod { god }) => {
                self.on_add_god(actor, god)
            }
            (MatchPhase::GodAssignment, Action::ChooseGod { god }) => {
                self.on_choose_god(actor, god)
            }
            (MatchPhase::StartingPlayerSelection, Action::SelectStartingPlayer { index }) => {
                self.on_select_starting_player(actor, index)
            }
            (MatchPhase::WorkerPlacement, Action::PlaceWorkers { first, second }) => {
                self.on_place_workers(actor, first, second)
            }
            (MatchPhase::TurnPlay, Action::Move { worker, to }) => self.on_move(actor, worker, to),
            (MatchPhase::TurnPlay, Action::Build { to, dome }) => self.on_build(actor, to, dome),
            (phase, _) => Err(ActionError::PhaseViolation { phase }),
        };

        match result {
            Ok(Handled::Applied(envelopes)) => {
                self.game.record_action(actor, action, turn);
                envelopes
            }
            Ok(Handled::Ignored(envelopes)) => envelopes,
            Err(err) => {
                log::debug!(
                    "rejected {} from {actor} during {}: {err}",
                    action.kind(),
                    self.phase
                );
                vec![Envelope::single(actor, OutboundMessage::rejection(&err))]
            }
        }
    }

    // ---- per-phase handlers ----

    fn on_select_count(&mut self, actor: PlayerId, count: u8) -> Result<Handled, ActionError> {
        if actor.index() != 0 {
            return Err(ActionError::ProtocolViolation {
                reason: "only the first player declares the match size",
            });
        }
        if self.declared_count.is_some() {
            return Err(ActionError::ProtocolViolation {
                reason: "player count already declared",
            });
        }
        if !(2..=3).contains(&count) {
            return Err(ActionError::PlayerCountOutOfBound { count });
        }

        self.declared_count = Some(count);
        Ok(Handled::Applied(vec![Envelope::single(
            actor,
            OutboundMessage::info(format!("The match will host {count} players")),
        )]))
    }

    fn on_select_color(
        &mut self,
        actor: PlayerId,
        color: PlayerColor,
    ) -> Result<Handled, ActionError> {
        if self.game.first_uncolored() != Some(actor) {
            return Err(ActionError::ProtocolViolation {
                reason: "not your turn to choose a color",
            });
        }
        self.game.assign_color(actor, color)?;
        let _ = self.game.auto_assign_last_color();

        if self.game.first_uncolored().is_none() {
            self.pick_challenger();
        }

        let mut out = self.flush();
        out.extend(self.prompts());
        Ok(Handled::Applied(out))
    }

    /// The one random draw of a match.
    fn pick_challenger(&mut self) {
        let actives = self.game.active_player_ids();
        let challenger = actives[self.rng.gen_index(actives.len())];
        log::debug!("{challenger} drawn as challenger");

        self.challenger = Some(challenger);
        self.game.set_current(challenger);
        self.game.init_deck(actives.len());
        self.enter(MatchPhase::ChallengerSelection);
    }

    fn on_add_god(&mut self, actor: PlayerId, god: GodName) -> Result<Handled, ActionError> {
        if self.challenger != Some(actor) {
            return Err(ActionError::ProtocolViolation {
                reason: "only the challenger builds the deck",
            });
        }
        match self.game.add_god_to_deck(god) {
            Ok(()) => {}
            Err(DeckError::Duplicate) => {
                // Soft rejection: answer, re-prompt, record nothing.
                let mut out = vec![Envelope::single(
                    actor,
                    OutboundMessage::info(format!("{god} is already in the deck")),
                )];
                out.extend(self.prompts());
                return Ok(Handled::Ignored(out));
            }
            Err(DeckError::Full) => return Err(ActionError::DeckFull),
        }

        if self.game.deck().is_full() {
            let next = self.game.next_active_after(actor);
            self.game.set_current(next);
            self.enter(MatchPhase::GodAssignment);
        }

        let mut out = self.flush();
        out.extend(self.prompts());
        Ok(Handled::Applied(out))
    }

    fn on_choose_god(&mut self, actor: PlayerId, god: GodName) -> Result<Handled, ActionError> {
        if self.game.current_player().id() != actor {
            return Err(ActionError::ProtocolViolation {
                reason: "not your turn to choose a god",
            });
        }
        self.game.assign_god(actor, god)?;

        if let Some(leftover) = self.game.deck().sole_remaining() {
            // The last card is the challenger's, no pick needed.
            let last = self
                .game
                .active_players()
                .find(|p| p.god().is_none())
                .map(Player::id);
            if let Some(last) = last {
                self.game.assign_god(last, leftover)?;
                self.game.set_current(last);
            }
            self.enter(MatchPhase::StartingPlayerSelection);
        } else if !self.game.deck().is_empty() {
            let next = self.game.next_active_after(actor);
            self.game.set_current(next);
        }

        let mut out = self.flush();
        out.extend(self.prompts());
        Ok(Handled::Applied(out))
    }

    fn on_select_starting_player(
        &mut self,
        actor: PlayerId,
        index: usize,
    ) -> Result<Handled, ActionError> {
        if self.challenger != Some(actor) {
            return Err(ActionError::ProtocolViolation {
                reason: "only the challenger chooses the starting player",
            });
        }
        let actives = self.game.active_player_ids();
        if index >= actives.len() {
            return Err(ActionError::PlayerIndexOutOfBound { index });
        }

        let chosen = actives[index];
        self.starting = Some(chosen);
        self.game.set_current(chosen);
        self.game
            .record_event(GameEvent::StartingPlayerChosen { player: chosen });
        self.enter(MatchPhase::WorkerPlacement);

        let mut out = self.flush();
        out.extend(self.prompts());
        Ok(Handled::Applied(out))
    }

    fn on_place_workers(
        &mut self,
        actor: PlayerId,
        first: Coord,
        second: Coord,
    ) -> Result<Handled, ActionError> {
        if self.game.current_player().id() != actor {
            return Err(ActionError::ProtocolViolation {
                reason: "not your turn to place workers",
            });
        }
        self.game.place_workers(actor, first, second)?;
        let mut out = self.flush();

        if self.game.active_players().all(Player::has_placed_workers) {
            out.push(Envelope::all(self.match_started_message()));
            if let Some(starting) = self.starting {
                self.game.set_current(starting);
            }
            self.step = TurnStep::Move;
            self.enter(MatchPhase::TurnPlay);
            log::info!(
                "match started with {} players",
                self.game.active_count()
            );
            self.game.begin_turn();
            out.extend(self.flush());
        } else {
            let next = self.game.next_active_after(actor);
            self.game.set_current(next);
            out.extend(self.prompts());
        }
        Ok(Handled::Applied(out))
    }

    fn on_move(&mut self, actor: PlayerId, slot: u8, to: Coord) -> Result<Handled, ActionError> {
        if self.game.current_player().id() != actor {
            return Err(ActionError::ProtocolViolation {
                reason: "not your turn",
            });
        }
        if !matches!(self.step, TurnStep::Move) {
            return Err(ActionError::ProtocolViolation {
                reason: "a build is pending",
            });
        }
        if slot > 1 {
            return Err(ActionError::WorkerSlotOutOfBound { slot });
        }
        self.game.board().space(to)?;

        let id = WorkerId::new(actor, slot);
        if !self.game.move_worker(id, to) {
            return Err(ActionError::illegal_target(to));
        }

        if let Some(winner) = self.game.winner() {
            log::info!("{winner} wins on turn {}", self.game.turn());
            self.game.end_match(EndReason::Victory { winner });
            self.enter(MatchPhase::Ended);
            return Ok(Handled::Applied(self.flush()));
        }

        self.step = TurnStep::Build { worker: id };
        Ok(Handled::Applied(self.flush()))
    }

    fn on_build(&mut self, actor: PlayerId, to: Coord, dome: bool) -> Result<Handled, ActionError> {
        if self.game.current_player().id() != actor {
            return Err(ActionError::ProtocolViolation {
                reason: "not your turn",
            });
        }
        let worker = match self.step {
            TurnStep::Build { worker } => worker,
            TurnStep::Move => {
                return Err(ActionError::ProtocolViolation {
                    reason: "no move made yet",
                })
            }
        };
        let space = self.game.board().space(to)?;
        if !dome && space.tower().level() == MAX_LEVEL {
            return Err(ActionError::TowerFull { coord: to });
        }

        if !self.game.build_at(worker, to, dome) {
            return Err(ActionError::illegal_target(to));
        }

        self.step = TurnStep::Move;
        self.game.advance_turn();
        Ok(Handled::Applied(self.flush()))
    }

    // ---- envelope production ----

    fn enter(&mut self, phase: MatchPhase) {
        log::debug!("phase {} -> {phase}", self.phase);
        self.phase = phase;
    }

    /// Drain the aggregate's events and route each through the table.
    fn flush(&mut self) -> Vec<Envelope> {
        let events = self.game.drain_events();
        let mut out = Vec::new();
        for event in &events {
            out.extend(messages::route(event, &self.game));
        }
        out
    }

    /// The prompt(s) for whoever must act next in the current phase.
    fn prompts(&self) -> Vec<Envelope> {
        match self.phase {
            MatchPhase::ColorSelection => {
                let chooser = match self.game.first_uncolored() {
                    Some(id) => id,
                    None => return Vec::new(),
                };
                vec![
                    Envelope::single(
                        chooser,
                        OutboundMessage::ColorRequest {
                            remaining: self.game.colors().remaining().to_vec(),
                        },
                    ),
                    Envelope::all_except(
                        chooser,
                        OutboundMessage::info(format!(
                            "{} is choosing a color",
                            self.nickname(chooser)
                        )),
                    ),
                ]
            }
            MatchPhase::ChallengerSelection => {
                let challenger = match self.challenger {
                    Some(id) => id,
                    None => return Vec::new(),
                };
                let deck = self.game.deck();
                let available: Vec<GodName> = GodName::ALL
                    .iter()
                    .copied()
                    .filter(|god| !deck.contains(*god))
                    .collect();
                let mut text = format!(
                    "You are the challenger! Add a god to the deck ({}/{}).",
                    deck.len(),
                    deck.capacity()
                );
                for god in &available {
                    text.push_str(&format!("\n{god}: {}", self.catalog.card(*god).description()));
                }
                vec![
                    Envelope::single(
                        challenger,
                        OutboundMessage::ChallengerPrompt {
                            text,
                            gods: Some(available),
                            players: None,
                        },
                    ),
                    Envelope::all_except(
                        challenger,
                        OutboundMessage::info(format!(
                            "The challenger {} is building the god deck",
                            self.nickname(challenger)
                        )),
                    ),
                ]
            }
            MatchPhase::GodAssignment => {
                let chooser = self.game.current_player().id();
                let gods = self.game.deck().cards().to_vec();
                let mut text = String::from("Choose your god:");
                for god in &gods {
                    text.push_str(&format!("\n{god}: {}", self.catalog.card(*god).description()));
                }
                vec![
                    Envelope::single(
                        chooser,
                        OutboundMessage::GodAssignmentPrompt { text, gods },
                    ),
                    Envelope::all_except(
                        chooser,
                        OutboundMessage::info(format!(
                            "{} is choosing a god",
                            self.nickname(chooser)
                        )),
                    ),
                ]
            }
            MatchPhase::StartingPlayerSelection => {
                let challenger = match self.challenger {
                    Some(id) => id,
                    None => return Vec::new(),
                };
                let players: Vec<String> = self
                    .game
                    .active_players()
                    .map(|p| p.nickname().to_string())
                    .collect();
                vec![
                    Envelope::single(
                        challenger,
                        OutboundMessage::ChallengerPrompt {
                            text: "Choose the starting player".to_string(),
                            gods: None,
                            players: Some(players),
                        },
                    ),
                    Envelope::all_except(
                        challenger,
                        OutboundMessage::info(format!(
                            "{} is choosing the starting player",
                            self.nickname(challenger)
                        )),
                    ),
                ]
            }
            MatchPhase::WorkerPlacement => {
                let placer = self.game.current_player().id();
                vec![
                    Envelope::single(
                        placer,
                        OutboundMessage::WorkerPlacementPrompt {
                            text: "Place your two workers".to_string(),
                            empty: self.game.board().empty_spaces(),
                        },
                    ),
                    Envelope::all_except(
                        placer,
                        OutboundMessage::info(format!(
                            "{} is placing workers",
                            self.nickname(placer)
                        )),
                    ),
                ]
            }
            MatchPhase::Lobby | MatchPhase::TurnPlay | MatchPhase::Ended => Vec::new(),
        }
    }

    /// One entry per active player in both maps.
    fn match_started_message(&self) -> OutboundMessage {
        let mut colors = FxHashMap::default();
        let mut gods = FxHashMap::default();
        for player in self.game.active_players() {
            if let (Some(color), Some(god)) = (player.color(), player.god()) {
                colors.insert(player.nickname().to_string(), color);
                gods.insert(player.nickname().to_string(), god);
            }
        }
        OutboundMessage::MatchStarted { colors, gods }
    }

    fn nickname(&self, id: PlayerId) -> String {
        match self.game.player(id) {
            Some(p) => p.nickname().to_string(),
            None => id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DeliveryScope;

    fn lobby_of_two() -> MatchController {
        let mut ctl = MatchController::new(42);
        ctl.add_player("alice").unwrap();
        ctl.add_player("bob").unwrap();
        ctl
    }

    #[test]
    fn test_count_declared_by_first_player_only() {
        let mut ctl = lobby_of_two();

        let out = ctl.handle(PlayerId::new(1), Action::SelectPlayerCount { count: 2 });
        assert!(matches!(
            &out[0].message,
            OutboundMessage::Error { .. }
        ));

        let out = ctl.handle(PlayerId::new(0), Action::SelectPlayerCount { count: 2 });
        assert!(matches!(&out[0].message, OutboundMessage::Info { .. }));
    }

    #[test]
    fn test_count_out_of_range() {
        let mut ctl = lobby_of_two();
        for bad in [0, 1, 4, 200] {
            let out = ctl.handle(PlayerId::new(0), Action::SelectPlayerCount { count: bad });
            match &out[0].message {
                OutboundMessage::Error { error } => {
                    assert_eq!(*error, messages::GameError::OutOfRange)
                }
                other => panic!("unexpected reply: {other:?}"),
            }
        }
    }

    #[test]
    fn test_start_needs_full_roster() {
        let mut ctl = MatchController::new(1);
        ctl.add_player("alice").unwrap();
        ctl.handle(PlayerId::new(0), Action::SelectPlayerCount { count: 2 });

        assert!(ctl.start().is_err());

        ctl.add_player("bob").unwrap();
        let out = ctl.start().unwrap();
        assert_eq!(ctl.phase(), MatchPhase::ColorSelection);

        // First chooser prompted, the other told to wait.
        assert!(matches!(
            &out[0],
            Envelope {
                scope: DeliveryScope::Single(p),
                message: OutboundMessage::ColorRequest { .. },
            } if *p == PlayerId::new(0)
        ));
        assert!(matches!(out[1].scope, DeliveryScope::AllExcept(_)));
    }

    #[test]
    fn test_roster_capped_at_declared_count() {
        let mut ctl = lobby_of_two();
        ctl.handle(PlayerId::new(0), Action::SelectPlayerCount { count: 2 });

        assert!(ctl.add_player("carol").is_err());
    }

    #[test]
    fn test_unknown_actor_rejected() {
        let mut ctl = lobby_of_two();
        let out = ctl.handle(
            PlayerId::new(7),
            Action::SelectPlayerCount { count: 2 },
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].scope, DeliveryScope::Single(PlayerId::new(7)));
        assert!(matches!(&out[0].message, OutboundMessage::Error { .. }));
    }

    #[test]
    fn test_wrong_phase_action_rejected_to_sender_only() {
        let mut ctl = lobby_of_two();
        let out = ctl.handle(
            PlayerId::new(0),
            Action::Move {
                worker: 0,
                to: Coord::new(1, 1),
            },
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].scope, DeliveryScope::Single(PlayerId::new(0)));
        match &out[0].message {
            OutboundMessage::Error { error } => match error {
                messages::GameError::InvalidInput { message } => {
                    assert_eq!(
                        message.as_deref(),
                        Some("action not accepted during the lobby phase")
                    );
                }
                other => panic!("unexpected error kind: {other:?}"),
            },
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_lobby_removal_keeps_lobby_open() {
        let mut ctl = lobby_of_two();
        let out = ctl.remove_player(PlayerId::new(1));

        assert_eq!(ctl.phase(), MatchPhase::Lobby);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].scope, DeliveryScope::AllExcept(PlayerId::new(1)));
        assert_eq!(ctl.game().active_count(), 1);
    }
}
