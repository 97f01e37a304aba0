//! Rules engine: ships, boards, the machine's targeting and match flow.
//!
//! Everything here needs only `alloc`, so it builds without the `std`
//! feature.

pub mod ai;
pub mod bitboard;
pub mod board;
pub mod common;
pub mod config;
pub mod fleet;
pub mod session;
pub mod ship;

pub use ai::{HuntTargetStrategy, MachineAi, RandomStrategy, StrategyKind, TargetingStrategy};
pub use bitboard::{BitBoard, BitBoardError};
pub use board::{Board, Cell, Grid};
pub use common::{BoardError, Coord, ShotResult};
pub use config::*;
pub use fleet::{is_standard_fleet, missing_classes, standard_fleet, ShipClass};
pub use session::{MachineShot, MatchSession, Phase, SessionError, TurnReport, Winner};
pub use ship::{Orientation, Placement, Ship, ShipId};
