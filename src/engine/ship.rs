//! Ships: length, placement and accumulated damage.

use core::fmt;

use super::fleet::ShipClass;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Grows rightward from the origin column.
    Horizontal,
    /// Grows downward from the origin row.
    Vertical,
}

impl Orientation {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    pub fn is_horizontal(self) -> bool {
        self == Orientation::Horizontal
    }

    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Top-left origin and orientation of a placed ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub orientation: Orientation,
}

impl Placement {
    pub fn new(row: usize, col: usize, orientation: Orientation) -> Self {
        Self {
            row,
            col,
            orientation,
        }
    }

    /// Cells covered by a ship of `length` at this placement, origin first.
    /// Coordinates are not bounds-checked.
    pub fn cells(self, length: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..length).map(move |i| match self.orientation {
            Orientation::Horizontal => (self.row, self.col + i),
            Orientation::Vertical => (self.row + i, self.col),
        })
    }
}

/// Index of a ship in its board's fleet.
///
/// Cells refer to ships through this id rather than holding them. Ids are
/// renumbered when a ship is removed, so do not keep one across a
/// [`Board::remove_ship`](crate::Board::remove_ship).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipId(pub(crate) usize);

impl ShipId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single ship. Created unplaced; the board marks it placed when it
/// accepts it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    length: usize,
    hits: usize,
    placement: Option<Placement>,
}

impl Ship {
    /// A fresh, unplaced and undamaged ship.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            hits: 0,
            placement: None,
        }
    }

    pub(crate) fn restore(length: usize, hits: usize, placement: Option<Placement>) -> Self {
        Self {
            length,
            hits: hits.min(length),
            placement,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Segments not yet hit.
    pub fn remaining_life(&self) -> usize {
        self.length - self.hits
    }

    /// Count one more hit. Saturates at the ship's length.
    pub fn register_hit(&mut self) {
        if self.hits < self.length {
            self.hits += 1;
        }
    }

    /// A zero-length hull is never sunk; boards refuse it anyway.
    pub fn is_sunk(&self) -> bool {
        self.length > 0 && self.hits >= self.length
    }

    pub fn place(&mut self, row: usize, col: usize, orientation: Orientation) {
        self.placement = Some(Placement::new(row, col, orientation));
    }

    pub(crate) fn unplace(&mut self) {
        self.placement = None;
    }

    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Cells the ship covers; empty while unplaced.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let length = self.length;
        self.placement
            .into_iter()
            .flat_map(move |p| p.cells(length))
    }

    /// The named class matching this ship's length, if any.
    pub fn class(&self) -> Option<ShipClass> {
        ShipClass::from_length(self.length)
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.class().map(ShipClass::name).unwrap_or("Ship");
        match self.placement {
            Some(p) => write!(
                f,
                "{} {{ length: {}, hits: {}, origin: ({}, {}), orientation: {:?} }}",
                name, self.length, self.hits, p.row, p.col, p.orientation
            ),
            None => write!(
                f,
                "{} {{ length: {}, hits: {}, unplaced }}",
                name, self.length, self.hits
            ),
        }
    }
}
