//! The 10×10 board: cell occupancy, shot history and the fleet it owns.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use super::bitboard::BitBoard;
use super::common::{BoardError, ShotResult};
use super::config::{BOARD_SIZE, FLEET};
use super::fleet::{is_standard_fleet, ShipClass};
use super::ship::{Orientation, Placement, Ship, ShipId};

/// Bitboard covering the whole grid.
pub type Grid = BitBoard<u128, BOARD_SIZE>;

const PLACEMENT_ATTEMPTS: usize = 100;

// Lengths without a hull class are refused.
fn check_length(length: usize) -> Result<(), BoardError> {
    match ShipClass::from_length(length) {
        Some(_) => Ok(()),
        None => Err(BoardError::InvalidShipLength(length)),
    }
}

/// One square of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    ship: Option<ShipId>,
    shot: bool,
}

impl Cell {
    pub(crate) fn new(ship: Option<ShipId>, shot: bool) -> Self {
        Self { ship, shot }
    }

    pub fn has_ship(&self) -> bool {
        self.ship.is_some()
    }

    pub fn ship_id(&self) -> Option<ShipId> {
        self.ship
    }

    pub fn is_shot(&self) -> bool {
        self.shot
    }
}

/// Ship placements, shot flags and the fleet of accepted ships.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    fleet: Vec<Ship>,
}

impl Board {
    /// Create an empty board (no ships, no shots).
    pub fn new() -> Self {
        Board {
            cells: [[Cell::default(); BOARD_SIZE]; BOARD_SIZE],
            fleet: Vec::new(),
        }
    }

    pub(crate) fn from_parts(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE], fleet: Vec<Ship>) -> Self {
        Board { cells, fleet }
    }

    /// Discard every ship and shot.
    pub fn clear(&mut self) {
        *self = Board::new();
    }

    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    /// Read-only view of a cell, `None` off the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn ship_id_at(&self, row: usize, col: usize) -> Option<ShipId> {
        self.cell(row, col).and_then(Cell::ship_id)
    }

    /// The ship covering `(row, col)`, if any.
    pub fn ship_at(&self, row: usize, col: usize) -> Option<&Ship> {
        self.ship_id_at(row, col).and_then(|id| self.ship(id))
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.fleet.get(id.0)
    }

    /// Ships accepted so far, in placement order.
    pub fn fleet(&self) -> &[Ship] {
        &self.fleet
    }

    /// Whether `ship` fits at `(row, col)` without leaving the grid or
    /// touching a cell that already holds a ship.
    pub fn can_place(&self, ship: &Ship, row: usize, col: usize, orientation: Orientation) -> bool {
        self.check_placement(ship.length(), Placement::new(row, col, orientation))
            .is_ok()
    }

    fn check_placement(&self, length: usize, placement: Placement) -> Result<(), BoardError> {
        check_length(length)?;
        let (end_row, end_col) = match placement.orientation {
            Orientation::Horizontal => (placement.row, placement.col.saturating_add(length - 1)),
            Orientation::Vertical => (placement.row.saturating_add(length - 1), placement.col),
        };
        if !Self::in_bounds(end_row, end_col) {
            return Err(BoardError::OutOfBounds);
        }
        if placement
            .cells(length)
            .any(|(r, c)| self.cells[r][c].has_ship())
        {
            return Err(BoardError::ShipOverlaps);
        }
        Ok(())
    }

    /// Put `ship` on the board and add it to the fleet.
    ///
    /// Re-validates the footprint and fails without touching the board if
    /// [`can_place`](Self::can_place) would have said no.
    pub fn place(
        &mut self,
        mut ship: Ship,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<ShipId, BoardError> {
        if ship.is_placed() {
            return Err(BoardError::ShipAlreadyPlaced);
        }
        let placement = Placement::new(row, col, orientation);
        self.check_placement(ship.length(), placement)?;

        let id = ShipId(self.fleet.len());
        for (r, c) in placement.cells(ship.length()) {
            self.cells[r][c].ship = Some(id);
        }
        ship.place(row, col, orientation);
        log::debug!("placed {:?} as ship #{}", ship, id.0);
        self.fleet.push(ship);
        Ok(id)
    }

    /// Lift a ship off the board, emptying its cells. The ship comes back
    /// unplaced so it can be put down again elsewhere. Ids of ships placed
    /// after it shift down by one.
    pub fn remove_ship(&mut self, id: ShipId) -> Result<Ship, BoardError> {
        if id.0 >= self.fleet.len() {
            return Err(BoardError::UnknownShip);
        }
        let mut ship = self.fleet.remove(id.0);
        for cell in self.cells.iter_mut().flatten() {
            cell.ship = match cell.ship {
                Some(s) if s == id => None,
                Some(s) if s.0 > id.0 => Some(ShipId(s.0 - 1)),
                other => other,
            };
        }
        ship.unplace();
        log::debug!("removed ship #{} ({} left)", id.0, self.fleet.len());
        Ok(ship)
    }

    /// Fire at `(row, col)`.
    ///
    /// A cell can be shot once; a second shot yields
    /// [`BoardError::AlreadyShot`] and changes nothing.
    pub fn shoot(&mut self, row: usize, col: usize) -> Result<ShotResult, BoardError> {
        if !Self::in_bounds(row, col) {
            return Err(BoardError::OutOfBounds);
        }
        let cell = &mut self.cells[row][col];
        if cell.shot {
            return Err(BoardError::AlreadyShot);
        }
        cell.shot = true;

        let Some(id) = cell.ship else {
            return Ok(ShotResult::Miss);
        };
        let ship = self
            .fleet
            .get_mut(id.0)
            .ok_or(BoardError::UnknownShip)?;
        ship.register_hit();
        if ship.is_sunk() {
            Ok(ShotResult::Sunk)
        } else {
            Ok(ShotResult::Hit)
        }
    }

    /// Exactly the ten standard ships, all placed.
    pub fn is_fleet_complete(&self) -> bool {
        self.fleet.iter().all(Ship::is_placed)
            && is_standard_fleet(self.fleet.iter().map(Ship::length))
    }

    /// Non-empty fleet with every ship sunk.
    pub fn is_game_over(&self) -> bool {
        !self.fleet.is_empty() && self.fleet.iter().all(Ship::is_sunk)
    }

    /// Ships still afloat.
    pub fn remaining_ship_count(&self) -> usize {
        self.fleet.iter().filter(|s| !s.is_sunk()).count()
    }

    pub fn sunk_ship_count(&self) -> usize {
        self.fleet.iter().filter(|s| s.is_sunk()).count()
    }

    pub fn occupied_cell_count(&self) -> usize {
        self.occupancy().count_ones()
    }

    /// Every cell holding a ship.
    pub fn occupancy(&self) -> Grid {
        self.cells_where(Cell::has_ship)
    }

    /// Every cell fired upon.
    pub fn shots(&self) -> Grid {
        self.cells_where(Cell::is_shot)
    }

    fn cells_where(&self, pred: impl Fn(&Cell) -> bool) -> Grid {
        let mut grid = Grid::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if pred(cell) {
                    let _ = grid.set(r, c);
                }
            }
        }
        grid
    }

    /// A random legal placement for a ship of `length`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<Placement, BoardError> {
        check_length(length)?;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = Orientation::from_horizontal(rng.random());
            let (max_r, max_c) = match orientation {
                Orientation::Horizontal => (BOARD_SIZE - 1, BOARD_SIZE - length),
                Orientation::Vertical => (BOARD_SIZE - length, BOARD_SIZE - 1),
            };
            let placement = Placement::new(
                rng.random_range(0..=max_r),
                rng.random_range(0..=max_c),
                orientation,
            );
            if self.check_placement(length, placement).is_ok() {
                return Ok(placement);
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Replace whatever is on the board with the standard fleet at random
    /// legal positions. A stalled layout is thrown away and redrawn.
    pub fn randomize_fleet<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        'layout: loop {
            self.clear();
            for class in FLEET {
                let placed = self
                    .random_placement(rng, class.length())
                    .and_then(|p| self.place(class.build(), p.row, p.col, p.orientation));
                if placed.is_err() {
                    log::debug!("random layout stalled on {}, redrawing", class.name());
                    continue 'layout;
                }
            }
            return;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  occupancy: {:?},\n  shots: {:?},\n  fleet: {:?}\n}}",
            self.occupancy(),
            self.shots(),
            self.fleet
        )
    }
}
