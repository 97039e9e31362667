//! Per-color army bookkeeping.

use serde::{Deserialize, Serialize};
use strum::EnumCount;
use tracing::{debug, instrument};

use crate::event::GameEvent;
use crate::piece::{Color, PieceId};
use crate::rank::Rank;
use crate::rules::EndReason;

/// One side of the match.
///
/// A player never touches pieces. It reads the events of each command and,
/// when one of its pieces acts after another one did, reports the previous
/// piece so the model can reset its back-and-forth counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    color: Color,
    name: String,
    remaining: [usize; Rank::COUNT],
    total_remaining: usize,
    eaten: [usize; Rank::COUNT],
    total_eaten: usize,
    last_moved: Option<PieceId>,
}

impl Player {
    /// A player owning a full, untouched army.
    pub fn new(color: Color, name: impl AsRef<str>) -> Self {
        Self::with_army(color, name, Rank::full_army())
    }

    /// A player owning exactly `ranks`.
    #[instrument(skip(name, ranks), fields(name = %name.as_ref()))]
    pub fn with_army(
        color: Color,
        name: impl AsRef<str>,
        ranks: impl IntoIterator<Item = Rank>,
    ) -> Self {
        let mut remaining = [0; Rank::COUNT];
        for rank in ranks {
            remaining[usize::from(rank.value())] += 1;
        }

        Self {
            color,
            name: name.as_ref().to_string(),
            remaining,
            total_remaining: remaining.iter().sum(),
            eaten: [0; Rank::COUNT],
            total_eaten: 0,
            last_moved: None,
        }
    }

    /// Army color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Pseudonym.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Live pieces left.
    pub fn remaining(&self) -> usize {
        self.total_remaining
    }

    /// Live pieces of `rank` left.
    pub fn remaining_of(&self, rank: Rank) -> usize {
        self.remaining[usize::from(rank.value())]
    }

    /// Enemy pieces killed.
    pub fn eaten(&self) -> usize {
        self.total_eaten
    }

    /// Enemy pieces of `rank` killed.
    pub fn eaten_of(&self, rank: Rank) -> usize {
        self.eaten[usize::from(rank.value())]
    }

    /// Own piece that acted last.
    pub fn last_moved(&self) -> Option<PieceId> {
        self.last_moved
    }

    /// Whether at least one live piece of `rank` is left.
    pub fn has_piece(&self, rank: Rank) -> bool {
        self.remaining_of(rank) > 0
    }

    /// Why this player has lost, if it has.
    pub fn loss_reason(&self) -> Option<EndReason> {
        if !self.has_piece(Rank::Flag) {
            Some(EndReason::FlagCaptured)
        } else if self.total_remaining
            == self.remaining_of(Rank::Bomb) + self.remaining_of(Rank::Flag)
        {
            Some(EndReason::ArmyImmobilized)
        } else {
            None
        }
    }

    /// No flag left, or only bombs and the flag.
    pub fn has_lost(&self) -> bool {
        self.loss_reason().is_some()
    }

    /// Updates the statistics from one event.
    ///
    /// Returns the own piece whose back-and-forth counter must be reset,
    /// when a different own piece just acted.
    #[instrument(skip(self, event), fields(color = %self.color))]
    pub fn observe(&mut self, event: &GameEvent) -> Option<PieceId> {
        if let Some((piece, color)) = event.actor() {
            if color != self.color {
                return None;
            }
            let previous = self.last_moved.replace(piece);
            return previous.filter(|prev| *prev != piece);
        }

        if let GameEvent::PieceDied { color, rank, .. } = event {
            let slot = usize::from(rank.value());
            if *color == self.color {
                self.remaining[slot] = self.remaining[slot].saturating_sub(1);
                self.total_remaining = self.total_remaining.saturating_sub(1);
                debug!(%rank, left = self.total_remaining, "Lost a piece");
            } else {
                self.eaten[slot] += 1;
                self.total_eaten += 1;
                debug!(%rank, eaten = self.total_eaten, "Took a piece");
            }
        }
        None
    }
}
