// Shot selection for the machine player.
//
// Every strategy keeps a used-shot set and never emits a coordinate twice.
// Hunt & Target fires at random unused cells; whenever the chosen cell holds
// a ship, its four orthogonal neighbours are queued and served first-in
// first-out (target mode) until the queue drains. The random strategy only
// ever hunts.

use alloc::collections::VecDeque;
use rand::Rng;

use super::bitboard::BitBoard;
use super::board::{Board, Cell};
use super::common::Coord;
use super::config::BOARD_SIZE;

type Shots = BitBoard<u128, BOARD_SIZE>;

/// Picks the machine's next shot against an opponent board.
pub trait TargetingStrategy {
    /// The next coordinate to fire at on `opponent`, or `None` once every
    /// cell has been used. A returned coordinate is never returned again.
    fn next_target<R: Rng + ?Sized>(&mut self, rng: &mut R, opponent: &Board) -> Option<Coord>;

    /// Whether `(row, col)` has already been emitted.
    fn is_used(&self, row: usize, col: usize) -> bool;
}

// Rejection sampling over unused cells.
fn draw_unused<R: Rng + ?Sized>(used: &mut Shots, rng: &mut R) -> Option<Coord> {
    if used.is_full() {
        return None;
    }
    loop {
        let r = rng.random_range(0..BOARD_SIZE);
        let c = rng.random_range(0..BOARD_SIZE);
        if !used.get(r, c).unwrap_or(true) {
            let _ = used.set(r, c);
            return Some((r, c));
        }
    }
}

/// Which strategy drives the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyKind {
    #[default]
    HuntTarget,
    Random,
}

/// Uniformly random unused cells, no follow-up on hits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RandomStrategy {
    used: Shots,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_used<I: IntoIterator<Item = Coord>>(used: I) -> Self {
        Self {
            used: used.into_iter().collect(),
        }
    }

    pub fn used_count(&self) -> usize {
        self.used.count_ones()
    }
}

impl TargetingStrategy for RandomStrategy {
    fn next_target<R: Rng + ?Sized>(&mut self, rng: &mut R, _opponent: &Board) -> Option<Coord> {
        draw_unused(&mut self.used, rng)
    }

    fn is_used(&self, row: usize, col: usize) -> bool {
        self.used.get(row, col).unwrap_or(false)
    }
}

/// Stateful selector that follows up on ships it has found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HuntTargetStrategy {
    pending: VecDeque<Coord>,
    used: Shots,
    inspect_queue: bool,
}

impl HuntTargetStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A strategy whose target queue already holds `pending`, front first.
    pub fn with_targets<I: IntoIterator<Item = Coord>>(pending: I) -> Self {
        Self::from_parts(None, pending)
    }

    pub(crate) fn from_parts<I, Q>(used: I, pending: Q) -> Self
    where
        I: IntoIterator<Item = Coord>,
        Q: IntoIterator<Item = Coord>,
    {
        Self {
            pending: pending.into_iter().collect(),
            used: used.into_iter().collect(),
            inspect_queue: false,
        }
    }

    // Target mode. Entries already used are dropped.
    fn take_queued(&mut self) -> Option<Coord> {
        while let Some((r, c)) = self.pending.pop_front() {
            if !self.is_used(r, c) {
                let _ = self.used.set(r, c);
                return Some((r, c));
            }
        }
        None
    }

    fn enqueue_neighbours(&mut self, (r, c): Coord) {
        if r > 0 {
            self.pending.push_back((r - 1, c));
        }
        if r + 1 < BOARD_SIZE {
            self.pending.push_back((r + 1, c));
        }
        if c > 0 {
            self.pending.push_back((r, c - 1));
        }
        if c + 1 < BOARD_SIZE {
            self.pending.push_back((r, c + 1));
        }
    }

    pub fn used_count(&self) -> usize {
        self.used.count_ones()
    }

    /// Queued target-mode candidates, front first.
    pub fn pending_targets(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pending.iter().copied()
    }

    /// Whether the strategy is currently in target mode.
    pub fn is_targeting(&self) -> bool {
        self.pending.iter().any(|&(r, c)| !self.is_used(r, c))
    }

    /// Debug aid: log the pending queue after every pick. Returns the new
    /// setting.
    pub fn toggle_queue_inspection(&mut self) -> bool {
        self.inspect_queue = !self.inspect_queue;
        self.inspect_queue
    }

    pub fn is_inspecting_queue(&self) -> bool {
        self.inspect_queue
    }
}

impl TargetingStrategy for HuntTargetStrategy {
    /// The chosen cell is peeked (never shot) so that a ship there queues
    /// its neighbours for the following calls.
    fn next_target<R: Rng + ?Sized>(&mut self, rng: &mut R, opponent: &Board) -> Option<Coord> {
        let target = match self.take_queued() {
            Some(t) => t,
            None => draw_unused(&mut self.used, rng)?,
        };
        if opponent
            .cell(target.0, target.1)
            .is_some_and(Cell::has_ship)
        {
            self.enqueue_neighbours(target);
        }
        if self.inspect_queue {
            log::debug!("ai fired at {:?}, pending targets: {:?}", target, self.pending);
        }
        Some(target)
    }

    fn is_used(&self, row: usize, col: usize) -> bool {
        self.used.get(row, col).unwrap_or(false)
    }
}

/// The machine's targeting, whichever strategy is plugged in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MachineAi {
    HuntTarget(HuntTargetStrategy),
    Random(RandomStrategy),
}

impl MachineAi {
    /// Fresh state for `kind`.
    pub fn new(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::HuntTarget => MachineAi::HuntTarget(HuntTargetStrategy::new()),
            StrategyKind::Random => MachineAi::Random(RandomStrategy::new()),
        }
    }

    /// State for `kind` that treats `used` as already emitted.
    pub(crate) fn with_history<I: IntoIterator<Item = Coord>>(kind: StrategyKind, used: I) -> Self {
        match kind {
            StrategyKind::HuntTarget => HuntTargetStrategy::from_parts(used, None).into(),
            StrategyKind::Random => RandomStrategy::from_used(used).into(),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            MachineAi::HuntTarget(_) => StrategyKind::HuntTarget,
            MachineAi::Random(_) => StrategyKind::Random,
        }
    }

    fn used(&self) -> &Shots {
        match self {
            MachineAi::HuntTarget(s) => &s.used,
            MachineAi::Random(s) => &s.used,
        }
    }

    /// Coordinates already emitted, row-major.
    pub fn used_shots(&self) -> impl Iterator<Item = Coord> + '_ {
        self.used().iter()
    }

    pub fn used_count(&self) -> usize {
        self.used().count_ones()
    }

    /// Queued target-mode candidates; always empty for the random strategy.
    pub fn pending_targets(&self) -> impl Iterator<Item = Coord> + '_ {
        let pending = match self {
            MachineAi::HuntTarget(s) => Some(&s.pending),
            MachineAi::Random(_) => None,
        };
        pending.into_iter().flatten().copied()
    }

    /// Toggles queue logging on the Hunt & Target strategy. The random
    /// strategy has no queue and always reports `false`.
    pub fn toggle_queue_inspection(&mut self) -> bool {
        match self {
            MachineAi::HuntTarget(s) => s.toggle_queue_inspection(),
            MachineAi::Random(_) => false,
        }
    }
}

impl Default for MachineAi {
    fn default() -> Self {
        Self::new(StrategyKind::default())
    }
}

impl From<HuntTargetStrategy> for MachineAi {
    fn from(strategy: HuntTargetStrategy) -> Self {
        MachineAi::HuntTarget(strategy)
    }
}

impl From<RandomStrategy> for MachineAi {
    fn from(strategy: RandomStrategy) -> Self {
        MachineAi::Random(strategy)
    }
}

impl TargetingStrategy for MachineAi {
    fn next_target<R: Rng + ?Sized>(&mut self, rng: &mut R, opponent: &Board) -> Option<Coord> {
        match self {
            MachineAi::HuntTarget(s) => s.next_target(rng, opponent),
            MachineAi::Random(s) => s.next_target(rng, opponent),
        }
    }

    fn is_used(&self, row: usize, col: usize) -> bool {
        self.used().get(row, col).unwrap_or(false)
    }
}
