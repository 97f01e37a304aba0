//! Match sequencing: fleet placement, the shot exchange, and the finish.
//!
//! A [`MatchSession`] owns both boards and the machine's targeting state for
//! one match. Every call runs to completion; out-of-phase calls are refused
//! with [`SessionError::WrongPhase`] and leave the match untouched.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use super::ai::{MachineAi, StrategyKind, TargetingStrategy};
use super::board::Board;
use super::common::{BoardError, ShotResult};
use super::config::TurnPolicy;
use super::fleet::{missing_classes, ShipClass};
use super::ship::{Orientation, Ship, ShipId};
use crate::persistence::{PersistError, SaveStore, SessionRecord};

/// Side that sank the other's whole fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Winner {
    Player,
    Machine,
}

/// Current stage of a match. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// The human arranges their fleet; no shots allowed.
    Placement,
    /// Shots are exchanged; the fleet is frozen.
    Battle,
    /// One fleet is gone; nothing else is accepted.
    Finished(Winner),
}

impl Phase {
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Finished(_))
    }

    pub fn winner(self) -> Option<Winner> {
        match self {
            Phase::Finished(w) => Some(w),
            _ => None,
        }
    }
}

/// One shot fired by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineShot {
    pub row: usize,
    pub col: usize,
    pub result: ShotResult,
}

/// What happened during one human shot, including the machine's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Result of the human's shot.
    pub result: ShotResult,
    /// Shots the machine fired in reply, in order. Empty when the human
    /// keeps the turn.
    pub machine_shots: Vec<MachineShot>,
    /// Phase after the whole exchange.
    pub phase: Phase,
}

impl TurnReport {
    /// The human scored and the match goes on: it is their turn again
    /// without the machine having fired.
    pub fn player_keeps_turn(&self) -> bool {
        self.result.is_hit() && !self.phase.is_finished()
    }
}

/// Errors returned by session operations. None of them changes the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The call is not allowed in the current phase.
    WrongPhase { expected: Phase, actual: Phase },
    /// Battle cannot start before the standard fleet is placed.
    FleetIncomplete,
    /// Every ship of this class is already on the board.
    ClassComplete(ShipClass),
    /// The board refused the placement or shot.
    Board(BoardError),
}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        SessionError::Board(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::WrongPhase { expected, actual } => {
                write!(f, "Not allowed now: expected {:?} phase, match is in {:?}", expected, actual)
            }
            SessionError::FleetIncomplete => write!(f, "Place the whole fleet before the battle"),
            SessionError::ClassComplete(class) => {
                write!(f, "All ships of class {} are already placed", class.name())
            }
            SessionError::Board(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}

/// One human-versus-machine match.
pub struct MatchSession {
    nickname: String,
    phase: Phase,
    player: Board,
    machine: Board,
    ai: MachineAi,
    sunk_ships: usize,
    turn_policy: TurnPolicy,
    store: Option<Box<dyn SaveStore>>,
}

impl MatchSession {
    /// A session in the placement phase with both boards empty. Most
    /// callers want [`start_new_game`](Self::start_new_game) instead.
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            phase: Phase::Placement,
            player: Board::new(),
            machine: Board::new(),
            ai: MachineAi::default(),
            sunk_ships: 0,
            turn_policy: TurnPolicy::default(),
            store: None,
        }
    }

    /// Fresh match: empty human board, randomized machine fleet.
    pub fn start_new_game<R: Rng + ?Sized>(nickname: impl Into<String>, rng: &mut R) -> Self {
        let mut session = Self::new(nickname);
        session.start_placement(rng);
        session
    }

    pub(crate) fn from_parts(
        nickname: String,
        phase: Phase,
        player: Board,
        machine: Board,
        ai: MachineAi,
        sunk_ships: usize,
        turn_policy: TurnPolicy,
    ) -> Self {
        Self {
            nickname,
            phase,
            player,
            machine,
            ai,
            sunk_ships,
            turn_policy,
            store: None,
        }
    }

    pub fn with_turn_policy(mut self, policy: TurnPolicy) -> Self {
        self.turn_policy = policy;
        self
    }

    /// Swap the machine's targeting strategy. The new strategy inherits the
    /// cells already fired upon, so it never repeats a shot.
    pub fn with_strategy(mut self, kind: StrategyKind) -> Self {
        if self.ai.kind() != kind {
            self.ai = MachineAi::with_history(kind, self.player.shots().iter());
        }
        self
    }

    /// Attach a save store; every later state change is autosaved to it.
    pub fn with_store(mut self, store: Box<dyn SaveStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Restore the match held in `store` and keep autosaving to it.
    pub fn continue_game(store: Box<dyn SaveStore>) -> Result<Self, PersistError> {
        let record = store.load()?;
        let session = MatchSession::try_from(record)?;
        log::info!(
            "resumed match of {} in {:?} phase",
            session.nickname,
            session.phase
        );
        Ok(session.with_store(store))
    }

    /// [`continue_game`](Self::continue_game), falling back to a fresh
    /// match when the save is missing or unreadable.
    pub fn resume_or_start<R: Rng + ?Sized>(
        store: Box<dyn SaveStore>,
        nickname: impl Into<String>,
        rng: &mut R,
    ) -> Self {
        match store.load().and_then(MatchSession::try_from) {
            Ok(session) => {
                log::info!("resumed match of {}", session.nickname);
                session.with_store(store)
            }
            Err(PersistError::NotFound) => {
                log::info!("no saved match, starting a new one");
                Self::new(nickname).with_store(store).started(rng)
            }
            Err(e) => {
                log::warn!("saved match unusable ({}), starting a new one", e);
                Self::new(nickname).with_store(store).started(rng)
            }
        }
    }

    fn started<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.start_placement(rng);
        self
    }

    /// Reset both boards and the machine's targeting state. The machine's
    /// fleet is laid out at random; the human's board starts empty.
    pub fn start_placement<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.player.clear();
        self.machine.randomize_fleet(rng);
        self.ai = MachineAi::new(self.ai.kind());
        self.sunk_ships = 0;
        self.phase = Phase::Placement;
        log::info!("{} is placing their fleet", self.nickname);
        self.autosave();
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn_policy(&self) -> TurnPolicy {
        self.turn_policy
    }

    /// The human's board.
    pub fn player_board(&self) -> &Board {
        &self.player
    }

    /// The machine's board. Renderers must hide unshot ships themselves.
    pub fn opponent_board(&self) -> &Board {
        &self.machine
    }

    pub fn strategy(&self) -> &MachineAi {
        &self.ai
    }

    /// Machine ships sunk by the human.
    pub fn sunk_ships(&self) -> usize {
        self.sunk_ships
    }

    /// Human ships sunk by the machine.
    pub fn ships_lost(&self) -> usize {
        self.player.sunk_ship_count()
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Debug aid: log the machine's pending target queue after each of its
    /// shots. Returns the new setting; always `false` for strategies without
    /// a queue.
    pub fn toggle_ai_queue_inspection(&mut self) -> bool {
        self.ai.toggle_queue_inspection()
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            log::warn!("rejected call: expected {:?} phase, in {:?}", expected, self.phase);
            Err(SessionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    pub fn can_place_ship(&self, ship: &Ship, row: usize, col: usize, orientation: Orientation) -> bool {
        self.phase == Phase::Placement && self.player.can_place(ship, row, col, orientation)
    }

    /// Place one of the human's ships. Only classes still missing from the
    /// standard fleet are accepted.
    pub fn attempt_placement(
        &mut self,
        ship: Ship,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<ShipId, SessionError> {
        self.ensure_phase(Phase::Placement)?;
        if let Some(class) = ship.class() {
            if !missing_classes(self.player.fleet().iter().map(Ship::length)).contains(&class) {
                return Err(SessionError::ClassComplete(class));
            }
        }
        let id = self.player.place(ship, row, col, orientation)?;
        self.autosave();
        Ok(id)
    }

    /// Pick a placed ship back up so it can be repositioned.
    pub fn remove_ship(&mut self, id: ShipId) -> Result<Ship, SessionError> {
        self.ensure_phase(Phase::Placement)?;
        let ship = self.player.remove_ship(id)?;
        self.autosave();
        Ok(ship)
    }

    /// Replace the human's layout with a random standard fleet.
    pub fn randomize_player_fleet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.ensure_phase(Phase::Placement)?;
        self.player.randomize_fleet(rng);
        self.autosave();
        Ok(())
    }

    /// Move to the battle phase. Requires the human's fleet to be complete;
    /// otherwise nothing changes.
    pub fn begin_battle(&mut self) -> Result<(), SessionError> {
        self.ensure_phase(Phase::Placement)?;
        if !self.player.is_fleet_complete() {
            log::warn!(
                "battle refused: {} of the fleet placed",
                self.player.fleet().len()
            );
            return Err(SessionError::FleetIncomplete);
        }
        self.phase = Phase::Battle;
        log::info!("battle begins");
        self.autosave();
        Ok(())
    }

    /// The human fires at the machine's board.
    ///
    /// A hit or sink keeps the turn with the human. A miss hands the turn
    /// to the machine, whose shots are returned in the report. A repeated
    /// coordinate is refused with `BoardError::AlreadyShot` and costs
    /// nothing.
    pub fn player_shot<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        row: usize,
        col: usize,
    ) -> Result<TurnReport, SessionError> {
        self.ensure_phase(Phase::Battle)?;
        let result = self.machine.shoot(row, col)?;
        log::debug!("{} fired at ({}, {}): {:?}", self.nickname, row, col, result);
        if result == ShotResult::Sunk {
            self.sunk_ships += 1;
        }

        let mut machine_shots = Vec::new();
        if self.machine.is_game_over() {
            self.finish(Winner::Player);
        } else if result == ShotResult::Miss {
            machine_shots = self.run_machine_turn(rng);
        }
        self.autosave();
        Ok(TurnReport {
            result,
            machine_shots,
            phase: self.phase,
        })
    }

    /// Let the machine fire at the human's board, following the turn
    /// policy. Normally driven by [`player_shot`](Self::player_shot).
    pub fn machine_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<MachineShot>, SessionError> {
        self.ensure_phase(Phase::Battle)?;
        let shots = self.run_machine_turn(rng);
        self.autosave();
        Ok(shots)
    }

    // Bounded by the strategy running out of unused cells.
    fn run_machine_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<MachineShot> {
        let mut shots = Vec::new();
        while self.phase == Phase::Battle {
            let Some((row, col)) = self.ai.next_target(rng, &self.player) else {
                log::warn!("machine has no cells left to fire at");
                break;
            };
            let result = match self.player.shoot(row, col) {
                Ok(result) => result,
                Err(BoardError::AlreadyShot) => {
                    log::warn!("machine picked spent cell ({}, {}), drawing again", row, col);
                    continue;
                }
                Err(e) => {
                    log::warn!("machine shot at ({}, {}) failed: {}", row, col, e);
                    break;
                }
            };
            log::debug!("machine fired at ({}, {}): {:?}", row, col, result);
            shots.push(MachineShot { row, col, result });

            if self.player.is_game_over() {
                self.finish(Winner::Machine);
            } else if result == ShotResult::Miss || self.turn_policy == TurnPolicy::SingleShot {
                break;
            }
        }
        shots
    }

    fn finish(&mut self, winner: Winner) {
        self.phase = Phase::Finished(winner);
        log::info!("match over, winner: {:?}", winner);
    }

    /// Write the match to the attached store now.
    pub fn save(&mut self) -> Result<(), PersistError> {
        let record = SessionRecord::from(&*self);
        match self.store.as_mut() {
            Some(store) => store.save(&record),
            None => Err(PersistError::NoStore),
        }
    }

    /// Remove the persisted match from the attached store.
    pub fn delete_save(&mut self) -> Result<(), PersistError> {
        match self.store.as_mut() {
            Some(store) => store.delete(),
            None => Err(PersistError::NoStore),
        }
    }

    // Best effort: failures are logged and play goes on. A finished match
    // clears its save instead.
    fn autosave(&mut self) {
        if self.store.is_none() {
            return;
        }
        if self.phase.is_finished() {
            if let Err(e) = self.delete_save() {
                log::warn!("could not clear finished match: {}", e);
            }
            return;
        }
        if let Err(e) = self.save() {
            log::warn!("autosave failed: {}", e);
        }
    }
}

impl fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchSession")
            .field("nickname", &self.nickname)
            .field("phase", &self.phase)
            .field("sunk_ships", &self.sunk_ships)
            .field("turn_policy", &self.turn_policy)
            .field("player", &self.player)
            .field("machine", &self.machine)
            .field("ai", &self.ai)
            .finish_non_exhaustive()
    }
}
