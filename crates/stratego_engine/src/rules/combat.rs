//! Combat resolution.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::rank::Rank;

/// Result of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CombatOutcome {
    /// Defender dies, attacker takes its square.
    AttackerWins,
    /// Attacker dies, defender stays.
    DefenderWins,
    /// Equal ranks: both die.
    BothDie,
}

impl CombatOutcome {
    /// Applies the attacker's win predicate, then the equal-rank rule.
    #[instrument]
    pub fn resolve(attacker: Rank, defender: Rank) -> Self {
        if attacker.beats(defender) {
            CombatOutcome::AttackerWins
        } else if attacker == defender {
            CombatOutcome::BothDie
        } else {
            CombatOutcome::DefenderWins
        }
    }

    /// Whether the attacker is still alive afterwards.
    pub fn attacker_survives(self) -> bool {
        self == CombatOutcome::AttackerWins
    }

    /// Whether the defender is still alive afterwards.
    pub fn defender_survives(self) -> bool {
        self == CombatOutcome::DefenderWins
    }
}
