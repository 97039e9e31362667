//! Pieces and their per-piece bookkeeping.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::geometry::Position;
use crate::rank::{MovementKind, Rank};

/// Army color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
    strum::Display,
)]
pub enum Color {
    /// Starts at the bottom of the board and plays first.
    Red,
    /// Starts at the top of the board.
    Blue,
}

impl Color {
    /// The other color.
    pub fn opponent(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// Index into per-player arrays (Red = 0, Blue = 1).
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }
}

/// Stable handle of a piece inside the [`Board`](crate::Board) arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("#{_0}")]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    /// Arena slot of this piece.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Back-and-forth tracker.
///
/// Remembers a reference square and how many times the piece came back to
/// it. Once `count` reaches the configured limit, returning there is refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RepetitionGuard {
    recorded: Option<Position>,
    count: u32,
}

impl RepetitionGuard {
    /// Whether stepping onto `target` is still allowed.
    pub fn allows(&self, target: Position, limit: u32) -> bool {
        self.count < limit || self.recorded != Some(target)
    }

    /// Updates the tracker for a successful action from `current` to `target`.
    pub fn record(&mut self, current: Position, target: Position) {
        match self.recorded {
            None => self.recorded = Some(current),
            Some(recorded) if recorded == target => self.count += 1,
            Some(recorded) if recorded != current => {
                self.count = 0;
                self.recorded = Some(current);
            }
            Some(_) => {}
        }
    }

    /// Clears the counter, keeping the reference square.
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// A piece on (or removed from) the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    rank: Rank,
    color: Color,
    position: Position,
    alive: bool,
    revealed: bool,
    has_been_in_combat: bool,
    guard: RepetitionGuard,
}

impl Piece {
    pub(crate) fn new(id: PieceId, rank: Rank, color: Color, position: Position) -> Self {
        Self {
            id,
            rank,
            color,
            position,
            alive: true,
            revealed: true,
            has_been_in_combat: false,
            guard: RepetitionGuard::default(),
        }
    }

    /// Arena handle.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Rank of the piece.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Owner color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current square (last square for removed pieces).
    pub fn position(&self) -> Position {
        self.position
    }

    /// False once the piece lost a fight.
    pub fn alive(&self) -> bool {
        self.alive
    }

    /// Whether the opponent currently sees the piece's rank.
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Whether the piece ever fought.
    pub fn has_been_in_combat(&self) -> bool {
        self.has_been_in_combat
    }

    /// Back-and-forth tracker.
    pub fn guard(&self) -> &RepetitionGuard {
        &self.guard
    }

    /// False for Bomb and Flag.
    pub fn is_movable(&self) -> bool {
        self.rank.is_movable()
    }

    /// Movement rule of the piece's rank.
    pub fn movement(&self) -> MovementKind {
        self.rank.movement()
    }

    /// Short label, e.g. `10-7F`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.rank.symbol(), self.position)
    }

    /// Clears the back-and-forth counter.
    pub fn reset_counter(&mut self) {
        self.guard.reset();
    }

    /// Shows or hides the piece to the opponent.
    pub fn set_revealed(&mut self, revealed: bool) {
        self.revealed = revealed;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn mark_in_combat(&mut self) {
        self.has_been_in_combat = true;
        self.revealed = true;
    }

    pub(crate) fn guard_mut(&mut self) -> &mut RepetitionGuard {
        &mut self.guard
    }
}
