//! Common types for the rules engine: shot outcomes and board errors.

use crate::engine::bitboard::BitBoardError;

/// `(row, col)` on the 10×10 grid.
pub type Coord = (usize, usize);

/// Outcome of a legal shot.
///
/// A repeated shot is not an outcome: it is reported as
/// [`BoardError::AlreadyShot`] so turn sequencing can never confuse it
/// with a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotResult {
    /// Shot landed on open water.
    Miss,
    /// Shot struck a ship that is still afloat.
    Hit,
    /// Shot struck the last intact segment of a ship.
    Sunk,
}

impl ShotResult {
    /// True for `Hit` and `Sunk`.
    pub fn is_hit(self) -> bool {
        !matches!(self, ShotResult::Miss)
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error.
    BitBoard(BitBoardError),
    /// Coordinate or ship footprint leaves the grid.
    OutOfBounds,
    /// No ship class has this length.
    InvalidShipLength(usize),
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// The ship handed in already sits on a board.
    ShipAlreadyPlaced,
    /// No ship with that id is in the fleet.
    UnknownShip,
    /// The cell was already fired upon.
    AlreadyShot,
    /// Random placement found no free spot.
    UnableToPlaceShip,
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoard(err)
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::BitBoard(e) => write!(f, "BitBoard error: {}", e),
            BoardError::OutOfBounds => write!(f, "Position is outside the board"),
            BoardError::InvalidShipLength(len) => write!(f, "No ship class has length {}", len),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::ShipAlreadyPlaced => write!(f, "Ship is already placed on a board"),
            BoardError::UnknownShip => write!(f, "No such ship in the fleet"),
            BoardError::AlreadyShot => write!(f, "That cell has already been shot"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
