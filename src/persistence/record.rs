//! The save schema and its conversions to and from engine state.
//!
//! Restoring validates everything the engine relies on (grid size, ship
//! ids, footprints, hit counts, phase consistency) and reports any
//! mismatch as [`PersistError::Corrupt`] instead of building a broken
//! board.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::PersistError;
use crate::engine::{
    missing_classes, Board, Cell, HuntTargetStrategy, MachineAi, MatchSession, Orientation, Phase,
    Placement, RandomStrategy, Ship, ShipClass, ShipId, StrategyKind, TurnPolicy, Winner,
    BOARD_SIZE, NUM_SHIPS, SAVE_FORMAT_VERSION,
};

/// One grid square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    pub occupied: bool,
    pub shot: bool,
    /// Index into the owning board's `fleet`.
    pub ship_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipRecord {
    pub length: u8,
    pub hits: u8,
    pub placed: bool,
    /// `(row, col)` of the top-left cell; `(0, 0)` while unplaced.
    pub origin: (u8, u8),
    pub horizontal: bool,
}

/// A whole board: 100 cells row-major plus the fleet they point into.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardRecord {
    pub cells: Vec<CellRecord>,
    pub fleet: Vec<ShipRecord>,
}

/// Targeting strategy state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AiRecord {
    pub strategy: StrategyKind,
    pub used_shots: Vec<(u8, u8)>,
    /// Front of the queue first. Always empty for `StrategyKind::Random`.
    pub pending_targets: Vec<(u8, u8)>,
}

/// Everything needed to resume a match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionRecord {
    pub version: u32,
    pub nickname: String,
    /// Machine ships sunk by the human.
    pub sunk_ships: u32,
    pub phase: Phase,
    pub turn_policy: TurnPolicy,
    pub player_board: BoardRecord,
    pub opponent_board: BoardRecord,
    pub ai: AiRecord,
}

fn corrupt(msg: impl Into<String>) -> PersistError {
    PersistError::Corrupt(msg.into())
}

fn coord_in_bounds((r, c): (u8, u8)) -> Result<(usize, usize), PersistError> {
    let (r, c) = (r as usize, c as usize);
    if Board::in_bounds(r, c) {
        Ok((r, c))
    } else {
        Err(corrupt(format!("coordinate ({}, {}) is off the board", r, c)))
    }
}

impl From<&Ship> for ShipRecord {
    fn from(ship: &Ship) -> Self {
        let placement = ship.placement();
        ShipRecord {
            length: ship.length() as u8,
            hits: ship.hits() as u8,
            placed: placement.is_some(),
            origin: placement.map_or((0, 0), |p| (p.row as u8, p.col as u8)),
            horizontal: placement.map_or(true, |p| p.orientation.is_horizontal()),
        }
    }
}

impl TryFrom<&ShipRecord> for Ship {
    type Error = PersistError;

    fn try_from(record: &ShipRecord) -> Result<Self, Self::Error> {
        let length = record.length as usize;
        if ShipClass::from_length(length).is_none() {
            return Err(corrupt(format!("no ship class of length {}", length)));
        }
        if record.hits > record.length {
            return Err(corrupt(format!(
                "ship of length {} has {} hits",
                record.length, record.hits
            )));
        }
        let placement = if record.placed {
            let (row, col) = coord_in_bounds(record.origin)?;
            let placement = Placement::new(row, col, Orientation::from_horizontal(record.horizontal));
            if !placement.cells(length).all(|(r, c)| Board::in_bounds(r, c)) {
                return Err(corrupt("ship footprint leaves the board"));
            }
            Some(placement)
        } else {
            None
        };
        Ok(Ship::restore(length, record.hits as usize, placement))
    }
}

impl From<&Board> for BoardRecord {
    fn from(board: &Board) -> Self {
        let mut cells = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                let cell = board.cell(r, c).copied().unwrap_or_default();
                cells.push(CellRecord {
                    occupied: cell.has_ship(),
                    shot: cell.is_shot(),
                    ship_id: cell.ship_id().map(|id| id.index() as u32),
                });
            }
        }
        BoardRecord {
            cells,
            fleet: board.fleet().iter().map(ShipRecord::from).collect(),
        }
    }
}

impl TryFrom<&BoardRecord> for Board {
    type Error = PersistError;

    fn try_from(record: &BoardRecord) -> Result<Self, Self::Error> {
        if record.cells.len() != BOARD_SIZE * BOARD_SIZE {
            return Err(corrupt(format!(
                "expected {} cells, found {}",
                BOARD_SIZE * BOARD_SIZE,
                record.cells.len()
            )));
        }
        let fleet = record
            .fleet
            .iter()
            .map(Ship::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(idx) = fleet.iter().position(|s| !s.is_placed()) {
            return Err(corrupt(format!("fleet ship #{} is not placed", idx)));
        }

        let mut cells = [[Cell::default(); BOARD_SIZE]; BOARD_SIZE];
        let mut occupied = 0;
        for (idx, rec) in record.cells.iter().enumerate() {
            let (r, c) = (idx / BOARD_SIZE, idx % BOARD_SIZE);
            let ship = match rec.ship_id {
                Some(id) => {
                    let id = id as usize;
                    let ship = fleet
                        .get(id)
                        .ok_or_else(|| corrupt(format!("cell ({}, {}) names missing ship #{}", r, c, id)))?;
                    if !ship.cells().any(|cell| cell == (r, c)) {
                        return Err(corrupt(format!("ship #{} does not cover ({}, {})", id, r, c)));
                    }
                    occupied += 1;
                    Some(ShipId(id))
                }
                None => None,
            };
            if rec.occupied != ship.is_some() {
                return Err(corrupt(format!("cell ({}, {}) occupancy flag disagrees", r, c)));
            }
            cells[r][c] = Cell::new(ship, rec.shot);
        }

        // Cells only point at ships covering them, so matching totals means
        // every footprint cell points back at its ship.
        let footprint: usize = fleet.iter().map(Ship::length).sum();
        if occupied != footprint {
            return Err(corrupt("ship footprints overlap or are missing cells"));
        }
        for (idx, ship) in fleet.iter().enumerate() {
            let shot = ship.cells().filter(|&(r, c)| cells[r][c].is_shot()).count();
            if shot != ship.hits() {
                return Err(corrupt(format!(
                    "ship #{} records {} hits but {} of its cells were shot",
                    idx,
                    ship.hits(),
                    shot
                )));
            }
        }
        Ok(Board::from_parts(cells, fleet))
    }
}

impl From<&MachineAi> for AiRecord {
    fn from(ai: &MachineAi) -> Self {
        AiRecord {
            strategy: ai.kind(),
            used_shots: ai.used_shots().map(|(r, c)| (r as u8, c as u8)).collect(),
            pending_targets: ai.pending_targets().map(|(r, c)| (r as u8, c as u8)).collect(),
        }
    }
}

impl TryFrom<&AiRecord> for MachineAi {
    type Error = PersistError;

    fn try_from(record: &AiRecord) -> Result<Self, Self::Error> {
        let used = record
            .used_shots
            .iter()
            .map(|&coord| coord_in_bounds(coord))
            .collect::<Result<Vec<_>, _>>()?;
        let pending = record
            .pending_targets
            .iter()
            .map(|&coord| coord_in_bounds(coord))
            .collect::<Result<Vec<_>, _>>()?;
        match record.strategy {
            StrategyKind::HuntTarget => Ok(HuntTargetStrategy::from_parts(used, pending).into()),
            StrategyKind::Random if pending.is_empty() => Ok(RandomStrategy::from_used(used).into()),
            StrategyKind::Random => Err(corrupt("random strategy has queued targets")),
        }
    }
}

impl From<&MatchSession> for SessionRecord {
    fn from(session: &MatchSession) -> Self {
        SessionRecord {
            version: SAVE_FORMAT_VERSION,
            nickname: session.nickname().into(),
            sunk_ships: session.sunk_ships() as u32,
            phase: session.phase(),
            turn_policy: session.turn_policy(),
            player_board: BoardRecord::from(session.player_board()),
            opponent_board: BoardRecord::from(session.opponent_board()),
            ai: AiRecord::from(session.strategy()),
        }
    }
}

impl TryFrom<SessionRecord> for MatchSession {
    type Error = PersistError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        if record.version != SAVE_FORMAT_VERSION {
            return Err(corrupt(format!(
                "save format version {} is not supported (expected {})",
                record.version, SAVE_FORMAT_VERSION
            )));
        }
        let player = Board::try_from(&record.player_board)?;
        let machine = Board::try_from(&record.opponent_board)?;
        let ai = MachineAi::try_from(&record.ai)?;
        if !machine.is_fleet_complete() {
            return Err(corrupt("machine fleet is not the standard fleet"));
        }
        let sunk_ships = record.sunk_ships as usize;
        if sunk_ships > NUM_SHIPS || sunk_ships != machine.sunk_ship_count() {
            return Err(corrupt(format!(
                "{} ships recorded sunk, machine board has {}",
                sunk_ships,
                machine.sunk_ship_count()
            )));
        }
        if !ai.used_shots().eq(player.shots().iter()) {
            return Err(corrupt("machine shot history disagrees with the player board"));
        }

        let consistent = match record.phase {
            Phase::Placement => {
                let placed = player.fleet().len();
                let missing = missing_classes(player.fleet().iter().map(Ship::length)).len();
                placed + missing == NUM_SHIPS
                    && player.shots().is_empty()
                    && machine.shots().is_empty()
            }
            Phase::Battle => {
                player.is_fleet_complete() && !player.is_game_over() && !machine.is_game_over()
            }
            Phase::Finished(Winner::Player) => machine.is_game_over(),
            Phase::Finished(Winner::Machine) => player.is_game_over(),
        };
        if !consistent {
            return Err(corrupt(format!(
                "boards do not match the {:?} phase",
                record.phase
            )));
        }

        Ok(MatchSession::from_parts(
            record.nickname,
            record.phase,
            player,
            machine,
            ai,
            sunk_ships,
            record.turn_policy,
        ))
    }
}
